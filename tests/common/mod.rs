#![allow(dead_code)]

pub mod decode;

use std::cell::RefCell;
use std::io::{Error, ErrorKind};
use std::rc::Rc;
use std::time::Duration;

use gea_proto::Pause;

pub use decode::{decode_frame, decode_stream, reference_crc, DecodeError, DecodedFrame};

/// In-memory bus capturing everything the controller transmits.
pub struct SerialInterface {
    tx: Vec<u8>,
    writes: usize,
    fail_writes: Vec<usize>,
}

/// Write end of a [`SerialInterface`], handed to the encoder.
pub struct SerialIOPlane(Rc<RefCell<SerialInterface>>);

impl SerialIOPlane {
    pub fn new(serial_if: &Rc<RefCell<SerialInterface>>) -> SerialIOPlane {
        SerialIOPlane(serial_if.clone())
    }
}

impl SerialInterface {
    pub fn new() -> Rc<RefCell<SerialInterface>> {
        Rc::new(RefCell::new(SerialInterface {
            tx: Vec::new(),
            writes: 0,
            fail_writes: Vec::new(),
        }))
    }

    /// Fail the next write call.
    pub fn trigger_write_error(&mut self) {
        self.fail_writes.push(self.writes);
    }

    /// Fail the `n`th write call from now, counted from zero.
    pub fn trigger_write_error_at(&mut self, n: usize) {
        self.fail_writes.push(self.writes + n);
    }

    pub fn tx(&self) -> &[u8] {
        &self.tx
    }

    pub fn take_tx(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.tx)
    }
}

impl std::io::Write for SerialIOPlane {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut inner = self.0.borrow_mut();
        let call = inner.writes;
        inner.writes += 1;
        if let Some(pos) = inner.fail_writes.iter().position(|&n| n == call) {
            inner.fail_writes.remove(pos);
            Err(Error::new(ErrorKind::BrokenPipe, "IO write error"))
        } else {
            inner.tx.extend_from_slice(buf);
            Ok(buf.len())
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Records requested pauses instead of sleeping.
#[derive(Default)]
pub struct RecordPause(pub Vec<Duration>);

impl Pause for RecordPause {
    fn pause(&mut self, duration: Duration) {
        self.0.push(duration);
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
