//! JSON Lines event source.
//!
//! One [`SocialEvent`] per line, in log order. Blank lines are ignored.
//! The log is expected to carry non-decreasing timestamps; a regression is
//! logged, or rejected when strict ordering is on.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use simpub_types::SocialEvent;
use tracing::warn;

use crate::error::IndexerError;

/// An event together with the log line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedEvent {
    /// One-based line number in the log.
    pub line: usize,
    /// The decoded event.
    pub event: SocialEvent,
}

/// Iterator over the events of a JSON Lines log.
#[derive(Debug)]
pub struct JsonLinesSource<R> {
    lines: Lines<R>,
    line: usize,
    previous: Option<u64>,
    strict_ordering: bool,
}

impl JsonLinesSource<BufReader<File>> {
    /// Open a log file.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::Open`] if the file cannot be opened.
    pub fn open(path: &Path, strict_ordering: bool) -> Result<Self, IndexerError> {
        let file = File::open(path).map_err(|source| IndexerError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file), strict_ordering))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    /// Read events from any buffered reader.
    pub fn new(reader: R, strict_ordering: bool) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            previous: None,
            strict_ordering,
        }
    }

    fn check_order(&mut self, timestamp: u64) -> Result<(), IndexerError> {
        if let Some(previous) = self.previous {
            if timestamp < previous {
                if self.strict_ordering {
                    return Err(IndexerError::OutOfOrder {
                        line: self.line,
                        timestamp,
                        previous,
                    });
                }
                warn!(
                    line = self.line,
                    timestamp, previous, "Event timestamp went backwards"
                );
                return Ok(());
            }
        }
        self.previous = Some(timestamp);
        Ok(())
    }
}

impl<R: BufRead> Iterator for JsonLinesSource<R> {
    type Item = Result<SourcedEvent, IndexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = self.lines.next()?;
            self.line = self.line.saturating_add(1);
            let text = match raw {
                Ok(text) => text,
                Err(source) => {
                    return Some(Err(IndexerError::Read {
                        line: self.line,
                        source,
                    }));
                }
            };
            if text.trim().is_empty() {
                continue;
            }

            let line = self.line;
            let decoded = serde_json::from_str::<SocialEvent>(&text)
                .map_err(|source| IndexerError::Parse { line, source })
                .and_then(|event| {
                    self.check_order(event.timestamp)?;
                    Ok(SourcedEvent { line, event })
                });
            return Some(decoded);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;

    use simpub_types::{EventKind, UserId};

    use super::*;

    fn source(text: &str, strict: bool) -> JsonLinesSource<Cursor<String>> {
        JsonLinesSource::new(Cursor::new(text.to_owned()), strict)
    }

    const TWO_FOLLOWS: &str = r#"{"timestamp":1,"type":"Follow","followee":"0xa","follower":"0xb"}

{"timestamp":2,"type":"UnFollow","followee":"0xa","unfollower":"0xb"}
"#;

    #[test]
    fn reads_events_and_skips_blank_lines() {
        let events: Vec<SourcedEvent> = source(TWO_FOLLOWS, true)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].line, 1);
        assert_eq!(events[1].line, 3);
        assert_eq!(
            events[1].event.kind,
            EventKind::UnFollow {
                followee: UserId::new("0xa"),
                unfollower: UserId::new("0xb"),
            }
        );
    }

    #[test]
    fn malformed_line_reports_its_number() {
        let text = "{\"timestamp\":1,\"type\":\"Like\",\"post\":\"QmX\",\"user\":\"0xa\"}\nnot json\n";
        let results: Vec<_> = source(text, false).collect();
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(IndexerError::Parse { line: 2, .. })));
    }

    #[test]
    fn unknown_event_type_is_a_parse_error() {
        let text = r#"{"timestamp":1,"type":"Block","user":"0xa"}"#;
        let first = source(text, false).next().unwrap();
        assert!(matches!(first, Err(IndexerError::Parse { line: 1, .. })));
    }

    #[test]
    fn regression_is_tolerated_unless_strict() {
        let text = r#"{"timestamp":5,"type":"Follow","followee":"0xa","follower":"0xb"}
{"timestamp":3,"type":"Follow","followee":"0xa","follower":"0xc"}
{"timestamp":4,"type":"Follow","followee":"0xa","follower":"0xd"}
"#;
        let lenient: Vec<_> = source(text, false).collect();
        assert_eq!(lenient.len(), 3);
        assert!(lenient.iter().all(Result::is_ok));

        let strict: Vec<_> = source(text, true).collect();
        assert!(strict[0].is_ok());
        assert!(matches!(
            strict[1],
            Err(IndexerError::OutOfOrder {
                line: 2,
                timestamp: 3,
                previous: 5,
            })
        ));
        // The high-water mark stays at 5.
        assert!(matches!(strict[2], Err(IndexerError::OutOfOrder { line: 3, .. })));
    }

    #[test]
    fn equal_timestamps_are_in_order() {
        let text = r#"{"timestamp":2,"type":"Follow","followee":"0xa","follower":"0xb"}
{"timestamp":2,"type":"Follow","followee":"0xa","follower":"0xc"}
"#;
        assert!(source(text, true).all(|r| r.is_ok()));
    }
}
