use std::io::{self, Write};

use crate::engine::WealthRecord;
use crate::logging::{RunLogEvent, RunLogEventKind, RunLogWriter};

pub const REPLAY_CSV_HEADER: &str = "step,trader,wealth\n";

/// Writes wealth trajectories as `step,trader,wealth` rows.
pub struct ReplayCsvWriter<W: Write> {
    writer: W,
}

impl<W: Write> ReplayCsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        self.writer.write_all(REPLAY_CSV_HEADER.as_bytes())
    }

    pub fn append_wealth_records(&mut self, trader: &str, records: &[WealthRecord]) -> io::Result<()> {
        let trader = escape_csv_field(trader);
        for record in records {
            writeln!(self.writer, "{},{trader},{}", record.step, record.wealth)?;
        }
        Ok(())
    }

    /// Flushes, then logs the last written step so the log never runs ahead
    /// of the artifact.
    pub fn flush_and_log(
        &mut self,
        last_step: usize,
        run_log_writer: &mut dyn RunLogWriter,
    ) -> io::Result<()> {
        self.writer.flush()?;
        run_log_writer.write(RunLogEvent::new(
            last_step,
            RunLogEventKind::ReplayWritten,
            None,
        ));
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn escape_csv_field(value: &str) -> String {
    let needs_quotes = value
        .chars()
        .any(|ch| matches!(ch, ',' | '"' | '\n' | '\r'));
    if !needs_quotes {
        return value.to_string();
    }

    let escaped = value.replace('"', "\"\"");
    format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, io, rc::Rc};

    use crate::engine::WealthRecord;
    use crate::logging::{InMemoryRunLogWriter, RunLogEvent, RunLogWriter};

    use super::{ReplayCsvWriter, REPLAY_CSV_HEADER};

    struct TrackingWriter {
        bytes: Vec<u8>,
        flush_called: Rc<Cell<bool>>,
        flush_fails: bool,
    }

    impl TrackingWriter {
        fn new(flush_called: Rc<Cell<bool>>, flush_fails: bool) -> Self {
            Self {
                bytes: Vec::new(),
                flush_called,
                flush_fails,
            }
        }
    }

    impl io::Write for TrackingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flush_called.set(true);
            if self.flush_fails {
                return Err(io::Error::other("flush failed"));
            }
            Ok(())
        }
    }

    struct FlushAssertingLogWriter {
        flush_called: Rc<Cell<bool>>,
    }

    impl RunLogWriter for FlushAssertingLogWriter {
        fn write(&mut self, _event: RunLogEvent) {
            assert!(
                self.flush_called.get(),
                "expected writer flush before logging"
            );
        }
    }

    fn records() -> Vec<WealthRecord> {
        vec![
            WealthRecord {
                step: 0,
                wealth: 1000.0,
            },
            WealthRecord {
                step: 1,
                wealth: 1012.5,
            },
        ]
    }

    #[test]
    fn flush_and_log_flushes_before_emitting_log() {
        let flush_called = Rc::new(Cell::new(false));
        let writer = TrackingWriter::new(Rc::clone(&flush_called), false);
        let mut replay_writer = ReplayCsvWriter::new(writer);
        let mut log_writer = FlushAssertingLogWriter { flush_called };

        replay_writer
            .flush_and_log(7, &mut log_writer)
            .expect("flush should succeed before logging");
    }

    #[test]
    fn flush_and_log_propagates_flush_errors() {
        let flush_called = Rc::new(Cell::new(false));
        let writer = TrackingWriter::new(Rc::clone(&flush_called), true);
        let mut replay_writer = ReplayCsvWriter::new(writer);
        let mut log_writer = InMemoryRunLogWriter::new();

        let err = replay_writer
            .flush_and_log(3, &mut log_writer)
            .expect_err("flush failure should be returned");

        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(log_writer.events().len(), 0);
    }

    #[test]
    fn writes_header_then_one_row_per_record() {
        let mut replay_writer = ReplayCsvWriter::new(Vec::new());

        replay_writer.write_header().unwrap();
        replay_writer
            .append_wealth_records("ftpl", &records())
            .unwrap();

        let csv = String::from_utf8(replay_writer.into_inner()).unwrap();
        assert_eq!(csv, format!("{REPLAY_CSV_HEADER}0,ftpl,1000\n1,ftpl,1012.5\n"));
    }

    #[test]
    fn escapes_trader_names_with_csv_rules() {
        let mut replay_writer = ReplayCsvWriter::new(Vec::new());

        replay_writer
            .append_wealth_records("momentum(alpha=0.5, \"hot\")", &records()[..1])
            .unwrap();

        let csv = String::from_utf8(replay_writer.into_inner()).unwrap();
        assert_eq!(csv, "0,\"momentum(alpha=0.5, \"\"hot\"\")\",1000\n");
    }
}
