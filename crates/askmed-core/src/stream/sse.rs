/// Incremental decoder for `text/event-stream` bodies.
///
/// Feed raw body bytes as they arrive; complete events come back as their
/// joined `data` payloads. Only the `data` field is kept.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
    data: Vec<String>,
    has_data: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&raw[..newline]);
            let line = line.strip_suffix('\r').unwrap_or(&line);

            if let Some(payload) = self.handle_line(line) {
                events.push(payload);
            }
        }
        events
    }

    fn handle_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data.push(value.to_string());
            self.has_data = true;
        }
        None
    }

    fn dispatch(&mut self) -> Option<String> {
        if !self.has_data {
            return None;
        }
        self.has_data = false;
        let payload = self.data.join("\n");
        self.data.clear();
        Some(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_event() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b"data: {\"chunk\": \"hi\"}\n\n");
        assert_eq!(events, vec!["{\"chunk\": \"hi\"}"]);
    }

    #[test]
    fn test_event_split_across_pushes() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"ch").is_empty());
        assert!(decoder.push(b"unk\": \"a\"}\n").is_empty());
        assert_eq!(decoder.push(b"\n"), vec!["{\"chunk\": \"a\"}"]);
    }

    #[test]
    fn test_multibyte_char_split_across_pushes() {
        let mut decoder = SseDecoder::new();
        let bytes = "data: é\n\n".as_bytes();
        let (head, tail) = bytes.split_at(7);
        assert!(decoder.push(head).is_empty());
        assert_eq!(decoder.push(tail), vec!["é"]);
    }

    #[test]
    fn test_multiline_data_joined() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b"data: one\ndata: two\n\n");
        assert_eq!(events, vec!["one\ntwo"]);
    }

    #[test]
    fn test_crlf_comments_and_other_fields() {
        let mut decoder = SseDecoder::new();
        let events =
            decoder.push(b": keepalive\r\nevent: message\r\nid: 7\r\ndata:x\r\n\r\n\r\n");
        assert_eq!(events, vec!["x"]);
    }

    #[test]
    fn test_incomplete_event_is_held() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: partial\n").is_empty());
    }
}
