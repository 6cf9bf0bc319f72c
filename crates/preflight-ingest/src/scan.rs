//! Pre-scan for unterminated quoted fields.
//!
//! The tokenizer underneath is lenient about a quote that never closes: it
//! swallows the rest of the file into one field instead of failing. A
//! pre-flight check needs that surfaced with the offending line, so the
//! decoded text is scanned once with a small state machine before any
//! record is parsed.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UnclosedQuote {
    /// 1-based line on which the unterminated quoted field opened.
    pub line: u64,
    /// Byte offset of the record containing the field. Parsing is cut here
    /// so records before the fault still come through.
    pub truncate_at: usize,
}

#[derive(Clone, Copy)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteClose,
}

pub(crate) fn find_unclosed_quote(text: &str, delimiter: u8, quote: u8) -> Option<UnclosedQuote> {
    let mut state = State::FieldStart;
    let mut line: u64 = 1;
    let mut record_start: usize = 0;
    let mut open = None;

    for (i, &b) in text.as_bytes().iter().enumerate() {
        match state {
            State::FieldStart => {
                if b == quote {
                    open = Some(UnclosedQuote {
                        line,
                        truncate_at: record_start,
                    });
                    state = State::Quoted;
                } else if b == b'\n' {
                    line += 1;
                    record_start = i + 1;
                } else if b != delimiter {
                    state = State::Unquoted;
                }
            }
            State::Unquoted => {
                if b == delimiter {
                    state = State::FieldStart;
                } else if b == b'\n' {
                    line += 1;
                    record_start = i + 1;
                    state = State::FieldStart;
                }
            }
            State::Quoted => {
                if b == quote {
                    state = State::QuoteClose;
                } else if b == b'\n' {
                    // the field continues, but the physical line advances
                    line += 1;
                }
            }
            State::QuoteClose => {
                if b == quote {
                    // doubled quote: escaped literal, still inside the field
                    state = State::Quoted;
                } else if b == delimiter {
                    state = State::FieldStart;
                } else if b == b'\n' {
                    line += 1;
                    record_start = i + 1;
                    state = State::FieldStart;
                } else {
                    state = State::Unquoted;
                }
            }
        }
    }

    match state {
        State::Quoted => open,
        _ => None,
    }
}
