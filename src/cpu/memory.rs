use crate::compiler::arch::Word;

use super::CpuFault;

#[derive(Clone, Debug, PartialEq)]
pub struct Memory {
    words: Vec<Word>,
}

impl Memory {
    pub fn new(size: usize) -> Memory {
        Memory {
            words: vec![0; size],
        }
    }

    pub fn size(&self) -> usize {
        self.words.len()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Fails if `address` is outside of memory.
    pub fn check(&self, address: Word) -> Result<(), CpuFault> {
        if (address as usize) < self.size() {
            Ok(())
        } else {
            Err(CpuFault::AddressOutOfRange {
                address,
                size: self.size(),
            })
        }
    }

    pub fn read(&self, address: Word) -> Result<Word, CpuFault> {
        self.words
            .get(address as usize)
            .copied()
            .ok_or(CpuFault::AddressOutOfRange {
                address,
                size: self.size(),
            })
    }

    pub fn write(&mut self, address: Word, value: Word) -> Result<(), CpuFault> {
        let size = self.size();
        match self.words.get_mut(address as usize) {
            Some(word) => {
                *word = value;
                Ok(())
            }
            None => Err(CpuFault::AddressOutOfRange { address, size }),
        }
    }

    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    /// Clears memory and copies `image` in, starting at address 0.
    pub fn load(&mut self, image: &[Word]) -> Result<(), CpuFault> {
        if image.len() > self.size() {
            return Err(CpuFault::ProgramTooLarge {
                words: image.len(),
                size: self.size(),
            });
        }

        self.clear();
        self.words[..image.len()].copy_from_slice(image);
        Ok(())
    }
}
