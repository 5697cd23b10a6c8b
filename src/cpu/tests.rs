#[cfg(test)]
mod tests {
    use crate::compiler::arch::{RegisterOp, WordSize};
    use crate::compiler::assembler::AssembledOutput;
    use crate::compiler::{compile, Source};
    use crate::cpu::{CombinatorId, Cpu, CpuFault, MicroState, RegisterId};

    fn boot(text: &str) -> Cpu {
        let out = compile(&Source::new(text), WordSize::default()).unwrap();
        let mut cpu = Cpu::new(WordSize::default());
        cpu.load_program(&out.output).unwrap();
        cpu
    }

    /// The name of every state the machine passes through until it stops
    fn states(cpu: &mut Cpu) -> Vec<&'static str> {
        let mut states = vec![];
        while !cpu.is_stopped() && states.len() < 10_000 {
            cpu.tick();
            states.push(cpu.state().name());
        }
        states
    }

    #[test]
    fn test_alu() {
        for (comb, a, b, value, carry, zero) in vec![
            (CombinatorId::Adder, 510, 5, 3, true, false),
            (CombinatorId::Adder, 2, 3, 5, false, false),
            (CombinatorId::Adder, 256, 256, 0, true, true),
            (CombinatorId::Subtractor, 0, 1, 511, true, false),
            (CombinatorId::Subtractor, 7, 7, 0, false, true),
            (CombinatorId::And, 0b1100, 0b1010, 0b1000, false, false),
            (CombinatorId::Or, 0b1100, 0b1010, 0b1110, false, false),
            (CombinatorId::Xor, 0b1100, 0b1100, 0, false, true),
        ] {
            let mut cpu = Cpu::new(WordSize::default());
            let dp = cpu.datapath_mut();
            dp.set(RegisterId::A, a);
            dp.set(RegisterId::B, b);
            assert_eq!(dp.read_combinator(comb), value, "{:?}({}, {})", comb, a, b);
            assert_eq!(dp.flags.carry, carry, "{:?}({}, {})", comb, a, b);
            assert_eq!(dp.flags.zero, zero, "{:?}({}, {})", comb, a, b);
        }
    }

    #[test]
    fn test_address_units_leave_flags_alone() {
        let mut cpu = Cpu::new(WordSize::default());
        let dp = cpu.datapath_mut();
        dp.flags.carry = true;
        dp.flags.zero = true;
        dp.set(RegisterId::Stack, 511);
        dp.set(RegisterId::M, 3);
        assert_eq!(dp.read_combinator(CombinatorId::StackReadAddress), 2);
        assert!(dp.flags.carry);
        assert!(dp.flags.zero);
    }

    #[test]
    fn test_combinators_are_not_cached() {
        let mut cpu = Cpu::new(WordSize::default());
        cpu.datapath_mut().set(RegisterId::A, 1);
        assert_eq!(cpu.combinator(CombinatorId::Adder), 1);
        cpu.datapath_mut().set(RegisterId::B, 4);
        assert_eq!(cpu.combinator(CombinatorId::Adder), 5);
        assert!(!cpu.flags().carry);
    }

    #[test]
    fn test_register_actions() {
        for (op, before, after) in vec![
            (RegisterOp::Increment, 511, 0),
            (RegisterOp::Increment, 4, 5),
            (RegisterOp::Decrement, 0, 511),
            (RegisterOp::ShiftLeft, 0b1_0000_0001, 0b10),
            (RegisterOp::ShiftRight, 0b110, 0b11),
            (RegisterOp::ShiftRight, 1, 0),
            (RegisterOp::Invert, 5, 506),
        ] {
            let mut cpu = Cpu::new(WordSize::default());
            let dp = cpu.datapath_mut();
            dp.set(RegisterId::C, before);
            dp.components.apply(op, RegisterId::C);
            assert_eq!(dp.get(RegisterId::C), after, "{:?} {}", op, before);
        }
    }

    #[test]
    fn test_skip_widths() {
        for (text, pc, skipped) in vec![
            ("?!a\n+b\n!halt", 2, vec![]),
            ("?!a\nb = 5\n!halt", 3, vec!["skip1"]),
            ("?!a\nmem 10 = stack 0\n!halt", 4, vec!["skip2", "skip1"]),
        ] {
            let mut cpu = boot(text);
            let states = states(&mut cpu);
            assert_eq!(cpu.state(), MicroState::Halted, "{}", text);
            assert_eq!(cpu.register(RegisterId::Pc), pc, "{}", text);
            assert_eq!(cpu.register(RegisterId::B), 0, "{}", text);
            assert_eq!(cpu.memory().words()[10], 0, "{}", text);

            let seen: Vec<&str> = states
                .iter()
                .filter(|s| s.starts_with("skip"))
                .copied()
                .collect();
            assert_eq!(seen, skipped, "{}", text);
        }
    }

    #[test]
    fn test_conditions() {
        for (text, taken) in vec![
            ("?a", true),
            ("?!a", false),
            ("a = 1 ?a", false),
            ("a = 1 ?|ab", true),
            ("a = 1 ?ab", false),
            ("a = 1 b = 1 nul = sub ?Z", true),
            ("a = 0 b = 1 nul = sub ?C", true),
            ("a = 1 b = 1 nul = sum ?|CZ", false),
            ("a = 1 b = 1 nul = sum ?!|CZ", true),
        ] {
            let mut cpu = boot(&format!("{}\nd = 1\n!halt", text));
            cpu.run(1_000);
            assert_eq!(cpu.register(RegisterId::D) == 1, taken, "{}", text);
        }
    }

    #[test]
    fn test_countdown_program() {
        let text = "a=5; b=a; loop: ?b pc=:loopEnd; -b; out=b; pc=:loop; loopEnd: !done";
        let mut cpu = boot(text);
        cpu.run(10_000);
        assert_eq!(cpu.outputs(), &[4, 3, 2, 1, 0]);
        assert_eq!(cpu.state(), MicroState::Done);
        assert!(!cpu.is_running());
    }

    #[test]
    fn test_countup_program() {
        let text = "a=5; b=a; loop: ?b pc=:loopEnd; -b; out=sub; pc=:loop; loopEnd: !done";
        let mut cpu = boot(text);
        let log = cpu.run(10_000);
        assert_eq!(cpu.outputs(), &[1, 2, 3, 4, 5]);
        assert_eq!(cpu.state(), MicroState::Done);
        assert!(log.contains(&"[OUT] Output   5 ······█·█".to_string()), "{:?}", log);
        assert_eq!(log.last().map(|s| s.as_str()), Some("[INT] Done"));
    }

    #[test]
    fn test_runs_are_deterministic() {
        let text = "
            a = 3
            loop: ?a pc = :end
            push = a
            -a
            pc = :loop
            end: out = stack 0
            !done
        ";
        let mut first = boot(text);
        let mut second = boot(text);
        let first_log = first.run(10_000);
        let second_log = second.run(10_000);
        assert_eq!(first_log, second_log);
        assert_eq!(
            serde_json::to_string(&first.snapshot()).unwrap(),
            serde_json::to_string(&second.snapshot()).unwrap()
        );
        assert_eq!(first.outputs(), &[1]);
    }

    #[test]
    fn test_stack() {
        let mut cpu = boot(
            "push = 7\npush = 8\na = stack 0\nb = stack 1\n!pop\nc = stack 0\nd = stackptr 2\n!halt",
        );
        cpu.run(1_000);
        assert_eq!(cpu.register(RegisterId::A), 8);
        assert_eq!(cpu.register(RegisterId::B), 7);
        assert_eq!(cpu.register(RegisterId::C), 7);
        assert_eq!(cpu.register(RegisterId::D), 256);
        assert_eq!(cpu.register(RegisterId::Stack), 254);
        assert_eq!(&cpu.memory().words()[253..255], &[8, 7]);
    }

    #[test]
    fn test_memory() {
        let mut cpu = boot("mem 21 = 9\na = mem 21\nm = 21\nb = mem\nn = 30\nmem = b\nc = mem 30\n!halt");
        cpu.run(1_000);
        assert_eq!(cpu.register(RegisterId::A), 9);
        assert_eq!(cpu.register(RegisterId::B), 9);
        assert_eq!(cpu.register(RegisterId::C), 9);
        assert_eq!(cpu.memory().words()[21], 9);
        assert_eq!(cpu.memory().words()[30], 9);
    }

    #[test]
    fn test_read_out_of_range() {
        let mut cpu = boot("b = 1\na = mem 300\n!halt");
        let log = cpu.run(1_000);
        assert_eq!(
            cpu.last_fault(),
            Some(&CpuFault::AddressOutOfRange {
                address: 300,
                size: 256
            })
        );
        assert_eq!(cpu.state(), MicroState::Halted);
        assert!(!cpu.is_running());
        assert_eq!(cpu.register(RegisterId::A), 0);
        assert_eq!(cpu.register(RegisterId::B), 1);
        assert_eq!(
            log.last().map(|s| s.as_str()),
            Some("[ERR] Address 300 is outside of memory (size 256)")
        );
    }

    #[test]
    fn test_write_out_of_range() {
        let mut cpu = boot("mem 300 = 7\n!halt");
        let before = cpu.memory().clone();
        cpu.run(1_000);
        assert!(matches!(
            cpu.last_fault(),
            Some(CpuFault::AddressOutOfRange { address: 300, .. })
        ));
        assert_eq!(*cpu.memory(), before);
    }

    #[test]
    fn test_faulting_write_leaves_registers_alone() {
        let mut cpu = boot("push = 7\n!halt");
        cpu.tick();
        assert_eq!(cpu.state(), MicroState::Fetch);
        cpu.datapath_mut().set(RegisterId::Stack, 0);
        cpu.datapath_mut().set(RegisterId::N, 9);
        let before = cpu.memory().clone();
        cpu.run(100);
        assert_eq!(
            cpu.last_fault(),
            Some(&CpuFault::AddressOutOfRange {
                address: 511,
                size: 256
            })
        );
        assert_eq!(cpu.state(), MicroState::Halted);
        assert_eq!(cpu.register(RegisterId::Stack), 0);
        assert_eq!(cpu.register(RegisterId::N), 9);
        assert_eq!(*cpu.memory(), before);

        let mut cpu = boot("mem 300 = 7\n!halt");
        cpu.run(100);
        assert!(cpu.last_fault().is_some());
        assert_eq!(cpu.register(RegisterId::N), 300);
        assert_eq!(cpu.register(RegisterId::BusBuffer), 0);
        assert_eq!(cpu.register(RegisterId::MemoryBuffer), 0);
    }

    #[test]
    fn test_invalid_opcode() {
        let mut cpu = Cpu::new(WordSize::default());
        let program = AssembledOutput {
            words: vec![0],
            ..AssembledOutput::default()
        };
        cpu.load_program(&program).unwrap();
        cpu.run(100);
        assert_eq!(
            cpu.last_fault(),
            Some(&CpuFault::InvalidOpcode {
                address: 0,
                word: 0
            })
        );

        // A reset recovers from a fault
        cpu.reset();
        assert!(cpu.last_fault().is_none());
        assert_eq!(cpu.state(), MicroState::Reset);
        assert!(cpu.is_running());
    }

    #[test]
    fn test_resume() {
        let mut cpu = boot("!pause\nout = 1\n!done\nout = 2\n!halt");
        assert!(!cpu.resume());

        cpu.run(1_000);
        assert_eq!(cpu.state(), MicroState::Pause);
        assert!(cpu.outputs().is_empty());

        assert!(cpu.resume());
        assert_eq!(cpu.tick(), vec!["[RUN] Resumed".to_string()]);
        assert_eq!(cpu.state(), MicroState::Finish);
        cpu.run(1_000);
        assert_eq!(cpu.state(), MicroState::Done);
        assert_eq!(cpu.outputs(), &[1]);

        assert!(cpu.resume());
        cpu.run(1_000);
        assert_eq!(cpu.state(), MicroState::Halted);
        assert_eq!(cpu.outputs(), &[1, 2]);
        assert!(!cpu.resume());
    }

    #[test]
    fn test_unloaded_machine_waits() {
        let mut cpu = Cpu::new(WordSize::default());
        assert!(cpu.is_stopped());
        assert!(cpu.tick().is_empty());
        assert!(cpu.run(10).is_empty());
        assert_eq!(cpu.state(), MicroState::Bootstrap);
        assert!(cpu.last_fault().is_none());

        assert!(cpu.resume());
        assert!(!cpu.is_stopped());
        assert_eq!(cpu.tick(), Vec::<String>::new());
        assert_eq!(cpu.state(), MicroState::Reset);
        assert_eq!(cpu.tick(), vec!["[RUN] Reset".to_string()]);
        assert_eq!(cpu.state(), MicroState::Fetch);
    }

    #[test]
    fn test_stopped_machine_does_not_move() {
        let mut cpu = boot("!done");
        cpu.run(100);
        let snapshot = cpu.snapshot();
        assert!(cpu.tick().is_empty());
        assert_eq!(cpu.snapshot().registers, snapshot.registers);
        assert_eq!(cpu.snapshot().state, "done");
    }

    #[test]
    fn test_program_too_large_for_memory() {
        let out = compile(&Source::new("a = 1 b = 2 c = 3"), WordSize::default()).unwrap();
        let mut cpu = Cpu::with_memory(WordSize::default(), 4);
        assert_eq!(
            cpu.load_program(&out.output),
            Err(CpuFault::ProgramTooLarge { words: 6, size: 4 })
        );
    }

    #[test]
    fn test_reset_state() {
        let mut cpu = boot("a = 1\n!halt");
        assert_eq!(cpu.tick(), vec!["[RUN] Reset".to_string()]);
        assert_eq!(cpu.state(), MicroState::Fetch);
        assert_eq!(cpu.register(RegisterId::Stack), 255);
        assert_eq!(cpu.register(RegisterId::Pc), 0);
        assert!(cpu.is_running());
    }
}
