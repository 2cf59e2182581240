//! Virtual machine for executing kcpu programs.

use kcpu_bytecode::InstructionStream;
use kcpu_core::{Stack, StackConfig};

use super::cpu::Cpu;
use super::error::Fault;
use super::host::{BufferHost, Host};
use super::memory::Memory;
use super::rng::{DEFAULT_SEED, Rng};
use super::state::{Control, State};
use super::table::OpcodeTable;
use super::trace::{NoopTracer, Tracer};

/// Runtime limits for program execution.
#[derive(Clone, Copy, Debug)]
pub struct FuelLimits {
    /// Maximum executed instructions (default: 10,000,000).
    pub(crate) exec_fuel: u64,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: 10_000_000,
        }
    }
}

impl FuelLimits {
    /// Create new fuel limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u64) -> Self {
        self.exec_fuel = fuel;
        self
    }

    pub fn get_exec_fuel(&self) -> u64 {
        self.exec_fuel
    }
}

/// Builder for VM instances.
pub struct VMBuilder<H> {
    program: Vec<u8>,
    host: H,
    ram_size: usize,
    screen: (usize, usize),
    limits: FuelLimits,
    stack_config: StackConfig,
    seed: u64,
}

impl VMBuilder<BufferHost> {
    /// Create a new VM builder with an in-memory host.
    pub fn new(program: impl Into<Vec<u8>>) -> Self {
        Self {
            program: program.into(),
            host: BufferHost::new(),
            ram_size: 1024,
            screen: (0, 0),
            limits: FuelLimits::default(),
            stack_config: StackConfig::default(),
            seed: DEFAULT_SEED,
        }
    }
}

impl<H: Host> VMBuilder<H> {
    /// Replace the host.
    pub fn host<H2: Host>(self, host: H2) -> VMBuilder<H2> {
        VMBuilder {
            program: self.program,
            host,
            ram_size: self.ram_size,
            screen: self.screen,
            limits: self.limits,
            stack_config: self.stack_config,
            seed: self.seed,
        }
    }

    /// Number of RAM cells (default: 1024).
    pub fn ram_size(mut self, cells: usize) -> Self {
        self.ram_size = cells;
        self
    }

    /// Initial VRAM dimensions (default: 0x0). `g_init` replaces them.
    pub fn screen(mut self, width: usize, height: usize) -> Self {
        self.screen = (width, height);
        self
    }

    /// Set the fuel limits.
    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u64) -> Self {
        self.limits = self.limits.exec_fuel(fuel);
        self
    }

    pub fn stack_config(mut self, config: StackConfig) -> Self {
        self.stack_config = config;
        self
    }

    /// Seed for the `$` operator (default: [`DEFAULT_SEED`]).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the VM.
    ///
    /// Fails with `RamTooLarge` or `ScreenTooLarge` when the configured
    /// sizes exceed the memory caps.
    pub fn build(self) -> Result<VM<H>, Fault> {
        let (width, height) = self.screen;
        let cpu = Cpu::new(
            Stack::with_config(self.stack_config),
            InstructionStream::new(self.program),
            Memory::new(self.ram_size, width, height)?,
            Rng::new(self.seed),
        );
        tracing::debug!(
            size = cpu.stream.len(),
            ram = self.ram_size,
            width,
            height,
            "program loaded"
        );

        Ok(VM {
            cpu,
            host: self.host,
            state: State::Running,
            exec_fuel: self.limits.get_exec_fuel(),
            steps: 0,
            limits: self.limits,
            ram_size: self.ram_size,
            screen: self.screen,
            stack_config: self.stack_config,
            seed: self.seed,
        })
    }
}

/// Virtual machine state for program execution.
pub struct VM<H = BufferHost> {
    pub(crate) cpu: Cpu,
    pub(crate) host: H,
    pub(crate) state: State,

    // Fuel tracking
    pub(crate) exec_fuel: u64,
    pub(crate) steps: u64,
    pub(crate) limits: FuelLimits,

    // Construction settings, reapplied by `load`
    ram_size: usize,
    screen: (usize, usize),
    stack_config: StackConfig,
    seed: u64,
}

impl VM<BufferHost> {
    /// Create a VM builder.
    pub fn builder(program: impl Into<Vec<u8>>) -> VMBuilder<BufferHost> {
        VMBuilder::new(program)
    }
}

impl<H: Host> VM<H> {
    /// Replace the program and reset all machine state.
    ///
    /// The host and the construction settings are kept, and the random
    /// stream restarts from the configured seed.
    pub fn load(&mut self, program: impl Into<Vec<u8>>) -> Result<(), Fault> {
        let (width, height) = self.screen;
        self.cpu = Cpu::new(
            Stack::with_config(self.stack_config),
            InstructionStream::new(program.into()),
            Memory::new(self.ram_size, width, height)?,
            Rng::new(self.seed),
        );
        self.state = State::Running;
        self.exec_fuel = self.limits.get_exec_fuel();
        self.steps = 0;
        tracing::debug!(size = self.cpu.stream.len(), "program loaded");
        Ok(())
    }

    /// Execute one instruction.
    pub fn step(&mut self) -> &State {
        self.step_with(&mut NoopTracer)
    }

    /// Execute one instruction with tracing.
    ///
    /// A terminal machine is left untouched and reports the same state.
    pub fn step_with<T: Tracer + ?Sized>(&mut self, tracer: &mut T) -> &State {
        if self.state.is_terminal() {
            return &self.state;
        }

        let ip = self.cpu.stream.position();
        match self.exec_step(ip, tracer) {
            Ok(State::Halted) => {
                tracing::debug!(ip, steps = self.steps, "halted");
                tracer.trace_halt(ip);
                self.state = State::Halted;
            }
            Ok(state) => self.state = state,
            Err(fault) => {
                // Leave ip on the faulting instruction for diagnostics.
                let _ = self.cpu.stream.set_position(ip as u64);
                tracing::warn!(ip, %fault, "faulted");
                tracer.trace_fault(ip, &fault);
                self.state = State::Faulted(fault);
            }
        }
        &self.state
    }

    /// Run until the machine halts or faults.
    pub fn run(&mut self) -> &State {
        self.run_with(&mut NoopTracer)
    }

    /// Run until the machine halts or faults, with tracing.
    pub fn run_with<T: Tracer + ?Sized>(&mut self, tracer: &mut T) -> &State {
        while !self.step_with(tracer).is_terminal() {}
        &self.state
    }

    fn exec_step<T: Tracer + ?Sized>(&mut self, ip: usize, tracer: &mut T) -> Result<State, Fault> {
        if self.cpu.stream.is_at_end() {
            return Ok(State::Halted);
        }

        if self.exec_fuel == 0 {
            return Err(Fault::ExecFuelExhausted(self.steps));
        }
        self.exec_fuel -= 1;
        self.steps += 1;

        let byte = self.cpu.stream.read_byte()?;
        let desc = OpcodeTable::get()
            .lookup(byte)
            .ok_or(Fault::InvalidOpcode { opcode: byte, ip })?;

        tracing::trace!(ip, opcode = desc.name, "step");
        tracer.trace_instruction(ip, desc.opcode);

        let available = self.cpu.stack.size();
        if available < desc.stack_inputs {
            return Err(Fault::MissingOperands {
                name: desc.name,
                needed: desc.stack_inputs,
                available,
            });
        }

        match (desc.handler)(&mut self.cpu, &mut self.host)? {
            Control::Continue => {}
            Control::Jump(target) => {
                self.cpu.stream.set_position(target)?;
                tracer.trace_jump(ip, target);
            }
            Control::Halt => {
                tracer.trace_stack(&self.cpu.stack);
                return Ok(State::Halted);
            }
        }

        tracer.trace_stack(&self.cpu.stack);

        if self.cpu.graphics_active {
            self.host.graphics_draw(self.cpu.frame())?;
        }

        Ok(State::Running)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Offset of the next instruction to fetch.
    pub fn ip(&self) -> usize {
        self.cpu.stream.position()
    }

    /// Instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn stack(&self) -> &Stack<f64> {
        &self.cpu.stack
    }

    pub fn registers(&self) -> &[f64] {
        self.cpu.memory.registers()
    }

    pub fn ram(&self) -> &[f64] {
        self.cpu.memory.ram()
    }

    pub fn vram(&self) -> &[f64] {
        self.cpu.memory.vram()
    }

    /// Screen dimensions as `(width, height)`.
    pub fn screen(&self) -> (usize, usize) {
        self.cpu.memory.screen()
    }

    pub fn graphics_active(&self) -> bool {
        self.cpu.graphics_active
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}
