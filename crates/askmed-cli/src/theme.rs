use crossterm::style::Color;

#[derive(Clone, Debug)]
pub struct Theme {
    pub name: &'static str,
    /// When false, output is plain text with markdown markers removed.
    pub color: bool,
    pub heading: Color,
    pub emphasis: Color,
    pub accent: Color,
    pub muted: Color,
    pub error: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            color: true,
            heading: Color::Rgb { r: 122, g: 162, b: 247 },
            emphasis: Color::Rgb { r: 224, g: 175, b: 104 },
            accent: Color::Cyan,
            muted: Color::DarkGrey,
            error: Color::Rgb { r: 247, g: 118, b: 142 },
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            color: true,
            heading: Color::Rgb { r: 49, g: 46, b: 129 },
            emphasis: Color::Rgb { r: 55, g: 48, b: 163 },
            accent: Color::DarkBlue,
            muted: Color::Grey,
            error: Color::DarkRed,
        }
    }

    pub fn plain() -> Self {
        Self {
            name: "plain",
            color: false,
            heading: Color::Reset,
            emphasis: Color::Reset,
            accent: Color::Reset,
            muted: Color::Reset,
            error: Color::Reset,
        }
    }

    pub fn for_preference(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }
}
