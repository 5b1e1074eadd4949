// record: u32 little-endian length + bincode Message, per frame

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use crate::error::ProtocolError;
use crate::Message;

const MAX_FRAME: usize = 10_000_000;

pub struct Recorder<W: Write> {
	writer: W,
	frames: usize,
}

impl Recorder<BufWriter<File>> {
	pub fn create(path: impl AsRef<Path>) -> Result<Self, ProtocolError> {
		let file = File::create(path)?;
		Ok(Self::new(BufWriter::new(file)))
	}
}

impl<W: Write> Recorder<W> {
	pub fn new(writer: W) -> Self {
		Self { writer, frames: 0 }
	}

	pub fn frames(&self) -> usize {
		self.frames
	}

	pub fn write_msg(&mut self, msg: &Message) -> Result<(), ProtocolError> {
		let bytes = msg.to_bytes()?;
		if bytes.len() > MAX_FRAME {
			return Err(ProtocolError::FrameTooLarge(bytes.len()));
		}
		self.writer.write_all(&(bytes.len() as u32).to_le_bytes())?;
		self.writer.write_all(&bytes)?;
		self.frames += 1;
		Ok(())
	}

	pub fn finish(mut self) -> Result<W, ProtocolError> {
		self.writer.flush()?;
		Ok(self.writer)
	}
}

pub struct Playback<R: Read> {
	reader: R,
	buf: Vec<u8>,
}

impl Playback<BufReader<File>> {
	pub fn open(path: impl AsRef<Path>) -> Result<Self, ProtocolError> {
		let file = File::open(path)?;
		Ok(Self::new(BufReader::new(file)))
	}
}

impl<R: Read> Playback<R> {
	pub fn new(reader: R) -> Self {
		Self {
			reader,
			buf: Vec::new(),
		}
	}

	/// Returns `None` at a clean end of stream.
	pub fn read_msg(&mut self) -> Result<Option<Message>, ProtocolError> {
		let mut len = [0u8; 4];
		match self.reader.read_exact(&mut len) {
			Ok(()) => {}
			Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
			Err(e) => return Err(e.into()),
		}
		let len = u32::from_le_bytes(len) as usize;
		if len > MAX_FRAME {
			return Err(ProtocolError::FrameTooLarge(len));
		}
		self.buf.resize(len, 0);
		self.reader.read_exact(&mut self.buf)?;
		Message::from_bytes(&self.buf).map(Some)
	}

	pub fn read_all(mut self) -> Result<Vec<Message>, ProtocolError> {
		let mut result = Vec::new();
		while let Some(msg) = self.read_msg()? {
			result.push(msg);
		}
		Ok(result)
	}
}
