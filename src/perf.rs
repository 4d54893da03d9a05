//! Hardware performance counters, sampled once around a whole stream/engine
//! run — never inside `read_char`.
//!
//! Without the `perf-counters` feature, [`CounterSet`] is a zero-sized stub
//! that always reports `None`, so the harness and its tests build and run
//! identically on non-Linux hosts and in default builds.

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CounterReading {
    pub instructions: u64,
    pub cycles: u64,
}

#[cfg(feature = "perf-counters")]
mod imp {
    use super::CounterReading;
    use perfcnt::linux::{HardwareEventType, PerfCounterBuilderLinux};
    use perfcnt::PerfCounter;

    pub struct CounterSet {
        instructions: Option<PerfCounter>,
        cycles: Option<PerfCounter>,
    }

    impl CounterSet {
        pub fn new() -> Self {
            let instructions = PerfCounterBuilderLinux::from_hardware_event(HardwareEventType::Instructions)
                .finish()
                .ok();
            let cycles = PerfCounterBuilderLinux::from_hardware_event(HardwareEventType::CPUCycles).finish().ok();
            CounterSet { instructions, cycles }
        }

        pub fn start(&mut self) {
            if let Some(c) = &mut self.instructions {
                let _ = c.start();
            }
            if let Some(c) = &mut self.cycles {
                let _ = c.start();
            }
        }

        /// Stop counting and report the reading, if counters were
        /// available on this host.
        pub fn stop(&mut self) -> Option<CounterReading> {
            let instructions = self.instructions.as_mut().and_then(|c| c.read().ok());
            let cycles = self.cycles.as_mut().and_then(|c| c.read().ok());
            if let Some(c) = &mut self.instructions {
                let _ = c.stop();
            }
            if let Some(c) = &mut self.cycles {
                let _ = c.stop();
            }
            match (instructions, cycles) {
                (Some(instructions), Some(cycles)) => Some(CounterReading { instructions, cycles }),
                _ => None,
            }
        }
    }

    impl Default for CounterSet {
        fn default() -> Self {
            CounterSet::new()
        }
    }
}

#[cfg(not(feature = "perf-counters"))]
mod imp {
    use super::CounterReading;

    #[derive(Default)]
    pub struct CounterSet;

    impl CounterSet {
        pub fn new() -> Self {
            CounterSet
        }
        pub fn start(&mut self) {}
        pub fn stop(&mut self) -> Option<CounterReading> {
            None
        }
    }
}

pub use imp::CounterSet;
