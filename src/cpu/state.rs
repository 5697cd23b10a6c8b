use serde::Serialize;

use crate::compiler::arch::{
    ConditionTarget, ControlAction, DestinationLocation, GeneralRegister, InstructionType,
    RegisterOp, SourceLocation, Word, ACTION_TARGET_SPAN, ACTION_TYPE_SPAN, CONDITION_INVERT,
    CONDITION_OR, DESTINATION_LOCATION_SPAN, SOURCE_LOCATION_SPAN,
};

use super::components::{CombinatorId, RegisterId};
use super::datapath::Datapath;
use super::CpuFault;

/// The micro states of the machine.  Every tick performs the work of one
/// state and moves to the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MicroState {
    Bootstrap,
    Reset,
    Fetch,
    Skip2,
    Skip1,
    Condition,
    Action,
    Movement,
    MovementInpArg,
    MovementInpArgNext,
    MovementOutArg,
    MovementOutArgNext,
    MovementFetch,
    MovementMove,
    MovementFlush,
    Finish,
    Done,
    Pause,
    Halted,
}

type Step = Result<MicroState, CpuFault>;

impl MicroState {
    pub fn name(&self) -> &'static str {
        use MicroState::*;
        match self {
            Bootstrap => "bootstrap",
            Reset => "reset",
            Fetch => "fetch",
            Skip2 => "skip2",
            Skip1 => "skip1",
            Condition => "condition",
            Action => "action",
            Movement => "movement",
            MovementInpArg => "movement/inp_arg",
            MovementInpArgNext => "movement/inp_arg+1",
            MovementOutArg => "movement/out_arg",
            MovementOutArgNext => "movement/out_arg+1",
            MovementFetch => "movement/fetch",
            MovementMove => "movement/move",
            MovementFlush => "movement/flush",
            Finish => "finish",
            Done => "done",
            Pause => "pause",
            Halted => "halted",
        }
    }

    /// True for the states the machine rests in until it is resumed or reset
    pub fn is_stopped(&self) -> bool {
        matches!(
            self,
            MicroState::Bootstrap | MicroState::Done | MicroState::Pause | MicroState::Halted
        )
    }

    /// Performs the work of this state and returns the next state.  Messages
    /// for the user are appended to `log`.
    pub fn step(self, dp: &mut Datapath, log: &mut Vec<String>) -> Step {
        use MicroState::*;
        match self {
            Bootstrap => Ok(if dp.flags.running { Reset } else { Bootstrap }),
            Reset => reset(dp, log),
            Fetch => fetch(dp),
            Skip2 => {
                dp.advance_pc();
                Ok(Skip1)
            }
            Skip1 => {
                dp.advance_pc();
                Ok(Finish)
            }
            Condition => condition(dp),
            Action => action(dp, log),
            Movement => movement(dp),
            MovementInpArg => {
                dp.advance_pc();
                Ok(MovementInpArgNext)
            }
            MovementInpArgNext => inp_arg_next(dp),
            MovementOutArg => {
                dp.advance_pc();
                Ok(MovementOutArgNext)
            }
            MovementOutArgNext => {
                let word = dp.memory.read(dp.get(RegisterId::Pc))?;
                dp.set(RegisterId::N, word);
                Ok(MovementFetch)
            }
            MovementFetch => movement_fetch(dp),
            MovementMove => movement_move(dp, log),
            MovementFlush => movement_flush(dp),
            Finish => {
                dp.advance_pc();
                Ok(Fetch)
            }
            Done | Pause => {
                if dp.flags.running {
                    log.push("[RUN] Resumed".into());
                    Ok(Finish)
                } else {
                    Ok(self)
                }
            }
            Halted => Ok(Halted),
        }
    }
}

fn reset(dp: &mut Datapath, log: &mut Vec<String>) -> Step {
    dp.components.clear();
    dp.flags.clear();
    let top = dp.memory.size().saturating_sub(1) as Word;
    dp.set(RegisterId::Stack, top);
    dp.flags.running = true;
    log.push("[RUN] Reset".into());
    Ok(MicroState::Fetch)
}

fn invalid_opcode(dp: &Datapath) -> CpuFault {
    CpuFault::InvalidOpcode {
        address: dp.get(RegisterId::Pc),
        word: dp.get(RegisterId::InstBuffer),
    }
}

/// The source and destination of the movement in the instruction buffer
fn decode_movement(dp: &Datapath) -> Result<(SourceLocation, DestinationLocation), CpuFault> {
    let inst = dp.get(RegisterId::InstBuffer);
    let from = SourceLocation::from_code(inst & SOURCE_LOCATION_SPAN);
    let to = DestinationLocation::from_code(inst & DESTINATION_LOCATION_SPAN);
    match (from, to) {
        (Some(from), Some(to)) => Ok((from, to)),
        _ => Err(invalid_opcode(dp)),
    }
}

/// The number of immediate words which follow an instruction
fn immediates(inst: Word) -> usize {
    if InstructionType::classify(inst) != Some(InstructionType::Movement) {
        return 0;
    }
    let from = SourceLocation::from_code(inst & SOURCE_LOCATION_SPAN);
    let to = DestinationLocation::from_code(inst & DESTINATION_LOCATION_SPAN);
    from.map_or(0, |l| l.is_immediate() as usize) + to.map_or(0, |l| l.is_immediate() as usize)
}

fn fetch(dp: &mut Datapath) -> Step {
    let inst = dp.memory.read(dp.get(RegisterId::Pc))?;
    dp.set(RegisterId::InstBuffer, inst);

    if dp.flags.skip {
        dp.flags.skip = false;
        return Ok(match immediates(inst) {
            0 => MicroState::Finish,
            1 => MicroState::Skip1,
            _ => MicroState::Skip2,
        });
    }

    match InstructionType::classify(inst) {
        Some(InstructionType::Movement) => Ok(MicroState::Movement),
        Some(InstructionType::Condition) => Ok(MicroState::Condition),
        Some(InstructionType::Action) => Ok(MicroState::Action),
        None => Err(invalid_opcode(dp)),
    }
}

fn condition(dp: &mut Datapath) -> Step {
    let inst = dp.get(RegisterId::InstBuffer);
    let or = inst & CONDITION_OR != 0;
    let invert = inst & CONDITION_INVERT != 0;

    let mut result = !or;
    for target in ConditionTarget::from_mask(inst) {
        let value = match target {
            ConditionTarget::Zero => dp.flags.zero,
            ConditionTarget::Carry => dp.flags.carry,
            ConditionTarget::A => dp.get(RegisterId::A) == 0,
            ConditionTarget::B => dp.get(RegisterId::B) == 0,
            ConditionTarget::C => dp.get(RegisterId::C) == 0,
        };
        if or {
            result |= value;
        } else {
            result &= value;
        }
    }

    if result == invert {
        dp.flags.skip = true;
    }
    Ok(MicroState::Finish)
}

fn action(dp: &mut Datapath, log: &mut Vec<String>) -> Step {
    let inst = dp.get(RegisterId::InstBuffer);
    if let Some(control) = ControlAction::from_code(inst) {
        return Ok(match control {
            ControlAction::Halt => {
                dp.flags.running = false;
                log.push("[INT] Halted".into());
                MicroState::Halted
            }
            ControlAction::Done => {
                dp.flags.running = false;
                log.push("[INT] Done".into());
                MicroState::Done
            }
            ControlAction::Pause => {
                dp.flags.running = false;
                log.push("[INT] Paused".into());
                MicroState::Pause
            }
            ControlAction::Pop => {
                dp.components.offset(RegisterId::Stack, 1);
                MicroState::Finish
            }
        });
    }

    let op = RegisterOp::from_code(inst & ACTION_TYPE_SPAN);
    let target = GeneralRegister::from_code(inst & ACTION_TARGET_SPAN);
    match (op, target) {
        (Some(op), Some(target)) => {
            dp.components.apply(op, RegisterId::from(target));
            Ok(MicroState::Finish)
        }
        _ => Err(invalid_opcode(dp)),
    }
}

fn movement(dp: &mut Datapath) -> Step {
    let (from, to) = decode_movement(dp)?;
    Ok(if from.is_immediate() {
        MicroState::MovementInpArg
    } else if to.is_immediate() {
        MicroState::MovementOutArg
    } else {
        MicroState::MovementFetch
    })
}

fn inp_arg_next(dp: &mut Datapath) -> Step {
    let (_, to) = decode_movement(dp)?;
    let word = dp.memory.read(dp.get(RegisterId::Pc))?;
    dp.set(RegisterId::M, word);
    Ok(if to.is_immediate() {
        MicroState::MovementOutArg
    } else {
        MicroState::MovementFetch
    })
}

fn movement_fetch(dp: &mut Datapath) -> Step {
    let (from, _) = decode_movement(dp)?;
    if from.reads_memory() {
        let address = if from.is_stack_relative() {
            dp.read_combinator(CombinatorId::StackReadAddress)
        } else {
            dp.get(RegisterId::M)
        };
        let value = dp.memory.read(address)?;
        dp.set(RegisterId::MemoryBuffer, value);
    }
    Ok(MicroState::MovementMove)
}

/// The address a memory destination will be written at, computed without
/// touching any register
fn write_address(dp: &Datapath, to: DestinationLocation) -> Option<Word> {
    match to {
        DestinationLocation::Mem | DestinationLocation::MemImmediate => {
            Some(dp.get(RegisterId::N))
        }
        DestinationLocation::Push => {
            let (top, _) = dp.word_size.wrap(dp.get(RegisterId::Stack) as i64 - 1);
            Some(top)
        }
        DestinationLocation::Stack | DestinationLocation::StackImmediate => {
            Some(dp.peek_combinator(CombinatorId::StackWriteAddress))
        }
        _ => None,
    }
}

fn movement_move(dp: &mut Datapath, log: &mut Vec<String>) -> Step {
    let (from, to) = decode_movement(dp)?;
    // A write which would fault must do so before any register changes
    if let Some(address) = write_address(dp, to) {
        dp.memory.check(address)?;
    }

    let value = match from {
        SourceLocation::Zero => 0,
        SourceLocation::Sum => dp.read_combinator(CombinatorId::Adder),
        SourceLocation::Sub => dp.read_combinator(CombinatorId::Subtractor),
        SourceLocation::And => dp.read_combinator(CombinatorId::And),
        SourceLocation::Or => dp.read_combinator(CombinatorId::Or),
        SourceLocation::Xor => dp.read_combinator(CombinatorId::Xor),
        SourceLocation::MemImmediate
        | SourceLocation::Mem
        | SourceLocation::StackImmediate
        | SourceLocation::Stack => dp.get(RegisterId::MemoryBuffer),
        SourceLocation::A => dp.get(RegisterId::A),
        SourceLocation::B => dp.get(RegisterId::B),
        SourceLocation::C => dp.get(RegisterId::C),
        SourceLocation::D => dp.get(RegisterId::D),
        SourceLocation::StackPtrImmediate => dp.read_combinator(CombinatorId::StackReadAddress),
        SourceLocation::Immediate => dp.get(RegisterId::M),
    };
    dp.set(RegisterId::BusBuffer, value);

    let register = match to {
        DestinationLocation::Nul => return Ok(MicroState::Finish),
        DestinationLocation::Push => {
            dp.components.offset(RegisterId::Stack, -1);
            dp.set(RegisterId::N, 0);
            dp.set(RegisterId::MemoryBuffer, value);
            return Ok(MicroState::MovementFlush);
        }
        to if to.writes_memory() => {
            dp.set(RegisterId::MemoryBuffer, value);
            return Ok(MicroState::MovementFlush);
        }
        DestinationLocation::Out => {
            dp.outputs.push(value);
            log.push(format!("[OUT] Output {:>3} {}", value, bar(value, dp.word_size.bits())));
            return Ok(MicroState::Finish);
        }
        DestinationLocation::Pc => {
            dp.set(RegisterId::Pc, value);
            return Ok(MicroState::Fetch);
        }
        DestinationLocation::A => RegisterId::A,
        DestinationLocation::B => RegisterId::B,
        DestinationLocation::C => RegisterId::C,
        DestinationLocation::D => RegisterId::D,
        DestinationLocation::M => RegisterId::M,
        DestinationLocation::N => RegisterId::N,
        _ => unreachable!("Memory destinations are handled above"),
    };
    dp.set(register, value);
    Ok(MicroState::Finish)
}

fn movement_flush(dp: &mut Datapath) -> Step {
    let (_, to) = decode_movement(dp)?;
    let address = match to {
        DestinationLocation::Mem | DestinationLocation::MemImmediate => dp.get(RegisterId::N),
        _ => dp.read_combinator(CombinatorId::StackWriteAddress),
    };
    dp.memory.write(address, dp.get(RegisterId::MemoryBuffer))?;
    Ok(MicroState::Finish)
}

/// Renders the bits of a word, most significant first
fn bar(value: Word, bits: u32) -> String {
    (0..bits)
        .rev()
        .map(|bit| if value & (1 << bit) != 0 { '█' } else { '·' })
        .collect()
}
