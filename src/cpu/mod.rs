//! A cycle level interpreter for the S9B machine.
//!
//! The machine is a small datapath (registers, combinational ALU units, and
//! memory) driven by a micro state machine.  Each call to [`Cpu::tick`]
//! performs exactly one micro step, so callers own the pacing of execution.
//! Given the same memory image and the same sequence of calls, execution is
//! fully deterministic.

use std::collections::BTreeMap;

use log::{debug, trace};
use serde::Serialize;

use crate::compiler::arch::{Word, WordSize};
use crate::compiler::assembler::AssembledOutput;
use crate::config::{ConfigError, MachineConfig};

mod components;
mod datapath;
mod error;
mod memory;
mod state;
mod tests;

pub use components::{CombinatorId, Components, RegisterId};
pub use datapath::{Datapath, Flags};
pub use error::CpuFault;
pub use memory::Memory;
pub use state::MicroState;

pub const DEFAULT_MEMORY_SIZE: usize = 256;

pub struct Cpu {
    datapath: Datapath,
    state: MicroState,
    last_fault: Option<CpuFault>,
    ticks: u64,
}

/// The observable state of the machine, for comparing runs and for tooling.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CpuSnapshot {
    pub state: &'static str,
    pub flags: Flags,
    pub registers: BTreeMap<&'static str, Word>,
    pub memory: Vec<Word>,
    pub outputs: Vec<Word>,
    pub ticks: u64,
    pub last_fault: Option<String>,
}

impl Cpu {
    pub fn new(word_size: WordSize) -> Cpu {
        Cpu::with_memory(word_size, DEFAULT_MEMORY_SIZE)
    }

    pub fn with_memory(word_size: WordSize, memory_size: usize) -> Cpu {
        Cpu {
            datapath: Datapath::new(word_size, memory_size),
            state: MicroState::Bootstrap,
            last_fault: None,
            ticks: 0,
        }
    }

    pub fn from_config(config: &MachineConfig) -> Result<Cpu, ConfigError> {
        let word_size = config.validate()?;
        Ok(Cpu::with_memory(word_size, config.memory_size))
    }

    pub fn state(&self) -> MicroState {
        self.state
    }

    pub fn flags(&self) -> &Flags {
        &self.datapath.flags
    }

    pub fn register(&self, id: RegisterId) -> Word {
        self.datapath.get(id)
    }

    /// The current output of a combinator.  Reading it this way does not
    /// change the flags.
    pub fn combinator(&self, id: CombinatorId) -> Word {
        self.datapath.peek_combinator(id)
    }

    pub fn memory(&self) -> &Memory {
        &self.datapath.memory
    }

    pub fn outputs(&self) -> &[Word] {
        &self.datapath.outputs
    }

    pub fn last_fault(&self) -> Option<&CpuFault> {
        self.last_fault.as_ref()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_running(&self) -> bool {
        self.datapath.flags.running
    }

    pub fn datapath(&self) -> &Datapath {
        &self.datapath
    }

    pub fn datapath_mut(&mut self) -> &mut Datapath {
        &mut self.datapath
    }

    /// Clears every register and flag.  The next tick performs the reset
    /// step, which starts execution from address 0.
    pub fn reset(&mut self) {
        self.datapath.components.clear();
        self.datapath.flags.clear();
        self.datapath.flags.running = true;
        self.state = MicroState::Reset;
        self.last_fault = None;
    }

    /// Clears memory, copies the program in, and resets the machine.
    pub fn load_program(&mut self, program: &AssembledOutput) -> Result<(), CpuFault> {
        self.datapath.memory.load(&program.words)?;
        self.datapath.outputs.clear();
        self.ticks = 0;
        self.reset();
        debug!(
            "Loaded {} words into {} words of memory",
            program.words.len(),
            self.datapath.memory.size()
        );
        Ok(())
    }

    /// Performs one micro step and returns the messages it produced.
    pub fn tick(&mut self) -> Vec<String> {
        let mut log = vec![];
        self.ticks += 1;
        match self.state.step(&mut self.datapath, &mut log) {
            Ok(next) => {
                trace!("{}: {} -> {}", self.ticks, self.state.name(), next.name());
                self.state = next;
            }
            Err(fault) => {
                debug!("Fault in {}: {}", self.state.name(), fault);
                log.push(format!("[ERR] {}", fault));
                self.datapath.flags.running = false;
                self.state = MicroState::Halted;
                self.last_fault = Some(fault);
            }
        }
        log
    }

    /// Continues execution after `!done` or `!pause`, or starts a machine
    /// which was never loaded.  Returns false if the machine is not stopped
    /// in one of those states.
    pub fn resume(&mut self) -> bool {
        match self.state {
            MicroState::Bootstrap | MicroState::Done | MicroState::Pause
                if !self.datapath.flags.running =>
            {
                self.datapath.flags.running = true;
                true
            }
            _ => false,
        }
    }

    /// Ticks until the machine stops or `max_ticks` have passed, returning
    /// every message produced.
    pub fn run(&mut self, max_ticks: u64) -> Vec<String> {
        let mut log = vec![];
        for _ in 0..max_ticks {
            if self.is_stopped() {
                break;
            }
            log.extend(self.tick());
        }
        log
    }

    /// True once the machine rests in a stopped state and will not move
    /// without a resume or reset.
    pub fn is_stopped(&self) -> bool {
        self.state.is_stopped() && !self.datapath.flags.running
    }

    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            state: self.state.name(),
            flags: self.datapath.flags,
            registers: self
                .datapath
                .components
                .iter()
                .map(|(id, value)| (id.name(), value))
                .collect(),
            memory: self.datapath.memory.words().to_vec(),
            outputs: self.datapath.outputs.clone(),
            ticks: self.ticks,
            last_fault: self.last_fault.as_ref().map(|f| f.to_string()),
        }
    }
}
