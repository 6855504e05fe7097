use std::io::Write;

use log::warn;

use super::cli::Verbosity;

/// Sink for user facing progress messages. The library only talks to this trait, so the
/// binary decides where the text goes.
pub trait Report {
    /// Verbosity the sink was set up with.
    fn verbosity(&self) -> Verbosity;

    /// Emit `msg` as is (no newline added).
    fn emit(&mut self, msg: &str);

    /// Emit `msg` if the sink's verbosity is at least `this_v`.
    fn report(&mut self, this_v: Verbosity, msg: &str) {
        if self.verbosity() >= this_v {
            self.emit(msg)
        }
    }
}

/// Reports to any writer, e.g. stdout or a Vec in tests.
pub struct Reporter<W: Write> {
    out: W,
    verbosity: Verbosity,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, verbosity: Verbosity) -> Self {
        Self { out, verbosity }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Report for Reporter<W> {
    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn emit(&mut self, msg: &str) {
        if let Err(e) = self.out.write_all(msg.as_bytes()).and_then(|_| self.out.flush()) {
            warn!("Could not write report: {}", e);
        }
    }
}

/// Drops every message.
pub struct Silent;

impl Report for Silent {
    fn verbosity(&self) -> Verbosity {
        Verbosity::Quiet
    }

    fn emit(&mut self, _msg: &str) {}
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn level_filter_test() {
        let mut r = Reporter::new(Vec::new(), Verbosity::Normal);
        r.report(Verbosity::Normal, "shown ");
        r.report(Verbosity::Chatty, "hidden");
        assert_eq!(r.into_inner(), b"shown ");
    }

    #[test]
    fn silent_test() {
        let mut s = Silent;
        s.report(Verbosity::Quiet, "nothing happens");
        assert_eq!(s.verbosity(), Verbosity::Quiet);
    }
}
