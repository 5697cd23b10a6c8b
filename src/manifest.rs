use serde::{Deserialize, Serialize};

use crate::compiler::arch::Word;
use crate::compiler::assembler::AssembledOutput;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Symbol {
    label: String,
    address: Word,
    /// One based line of the labelled statement
    line: u32,
}

/// The addresses every label was assembled to, so that tools can map the
/// memory of a running machine back to the source.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Manifest {
    word_bits: u32,
    words: usize,
    symbols: Vec<Symbol>,
}

impl Manifest {
    pub fn extract(output: &AssembledOutput) -> Manifest {
        let symbols = output
            .symbols
            .iter()
            .map(|s| Symbol {
                label: s.label.clone(),
                address: s.address,
                line: s.position.line + 1,
            })
            .collect();

        Manifest {
            word_bits: output.word_bits,
            words: output.words.len(),
            symbols,
        }
    }

    pub fn get_symbols(&self) -> Vec<(&str, Word)> {
        self.symbols
            .iter()
            .map(|s| (s.label.as_str(), s.address))
            .collect()
    }

    pub fn address_of(&self, label: &str) -> Option<Word> {
        self.symbols
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.address)
    }

    /// Loads a manifest from the given reader.
    pub fn read<R: std::io::Read>(reader: R) -> Result<Manifest, serde_yaml::Error> {
        let manifest: Manifest = serde_yaml::from_reader(reader)?;
        Ok(manifest)
    }

    /// Writes the Manifest to the given writer
    pub fn write<W: std::io::Write>(&self, writer: W) -> Result<(), serde_yaml::Error> {
        serde_yaml::to_writer(writer, self)
    }
}
