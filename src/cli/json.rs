use std::io::{self, Write};

use crate::testing::RunReport;
use crate::testing::probe::ProbeResult;
use crate::testing::runner::Reporter;

/// Writes the whole [`RunReport`] as one JSON document once the run ends.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn run_finished(&mut self, report: &RunReport) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, report)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

pub fn write_probe_report<W: Write>(out: &mut W, results: &[ProbeResult]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, results)?;
    writeln!(out)?;
    out.flush()
}
