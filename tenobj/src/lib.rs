//! File formats produced by the ten-bit assembler.
//!
//! Three textual artifacts exist, all rendered in the base-4 alphabet
//! `a`/`b`/`c`/`d`: the object file (`.ob`) holding the assembled image, the
//! entries file (`.ent`) listing exported symbols, and the externals file
//! (`.ext`) listing every use site of an imported symbol. The entries and
//! externals files share one row format, so a single table writer serves
//! both.

use std::fs::File;
use std::io::prelude::*;
use std::io::BufWriter;
use std::path::Path;

use tencore::encode::{
    address_to_base4, header_code_to_base4, header_data_to_base4, word_to_base4,
};
use tencore::{Address, Word};

#[cfg(test)]
mod test;

/// One emitted word together with the image address it occupies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AddressedWord {
    pub address: Address,
    pub word: Word,
}

/// The fully laid out image: instruction words first, data words behind them.
#[derive(Debug, PartialEq)]
pub struct ObjectImage {
    code: Vec<AddressedWord>,
    data: Vec<AddressedWord>,
}

impl ObjectImage {
    pub fn from(code: Vec<AddressedWord>, data: Vec<AddressedWord>) -> ObjectImage {
        ObjectImage { code, data }
    }

    pub fn code(&self) -> &[AddressedWord] {
        &self.code[..]
    }

    pub fn data(&self) -> &[AddressedWord] {
        &self.data[..]
    }

    pub fn code_len(&self) -> u32 {
        self.code.len() as u32
    }

    pub fn data_len(&self) -> u32 {
        self.data.len() as u32
    }
}

/// One row of the entries or externals table.
#[derive(Clone, Debug, PartialEq)]
pub struct TableEntry {
    pub name: String,
    pub address: Address,
}

impl TableEntry {
    pub fn new<S: Into<String>>(name: S, address: Address) -> TableEntry {
        TableEntry {
            name: name.into(),
            address,
        }
    }
}

/// Writes the object file: a header line with the code and data lengths,
/// then one `address TAB word` line per image word.
pub fn write_object<W: Write>(writer: &mut W, image: &ObjectImage) -> std::io::Result<()> {
    writeln!(
        writer,
        "{}\t{}",
        header_code_to_base4(image.code_len()),
        header_data_to_base4(image.data_len())
    )?;
    for item in image.code().iter().chain(image.data().iter()) {
        writeln!(
            writer,
            "{}\t{}",
            address_to_base4(item.address),
            word_to_base4(item.word)
        )?;
    }
    Ok(())
}

/// Writes an entries or externals table: one `name TAB address` line per row,
/// in the order given.
pub fn write_table<W: Write>(writer: &mut W, entries: &[TableEntry]) -> std::io::Result<()> {
    for entry in entries {
        writeln!(writer, "{}\t{}", entry.name, address_to_base4(entry.address))?;
    }
    Ok(())
}

pub trait WriteArtifactExt: Write + Sized {
    fn write_object(&mut self, image: &ObjectImage) -> std::io::Result<()> {
        write_object(self, image)
    }

    fn write_table(&mut self, entries: &[TableEntry]) -> std::io::Result<()> {
        write_table(self, entries)
    }
}

impl<W: Write + Sized> WriteArtifactExt for W {}

pub fn write_object_file<P: AsRef<Path>>(path: P, image: &ObjectImage) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_object(image)?;
    writer.flush()
}

pub fn write_table_file<P: AsRef<Path>>(path: P, entries: &[TableEntry]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_table(entries)?;
    writer.flush()
}
