//! Instruction handlers.
//!
//! Every handler reads its stream operand (if any), does its stack and
//! memory work and reports what the engine should do next. Stack depth has
//! already been checked against the opcode's declared inputs by the time a
//! handler runs.
//!
//! A handler that faults leaves the stack as it found it: addresses, jump
//! targets and screen sizes are checked on peeked values before anything
//! is popped.

use kcpu_bytecode::{EQ_EPSILON, Opcode};

use super::cpu::Cpu;
use super::error::Fault;
use super::host::Host;
use super::memory::to_address;
use super::state::Control;
use super::table::Handler;

pub(crate) fn handler_for(opcode: Opcode) -> Handler {
    match opcode {
        Opcode::Push => push,
        Opcode::Pop => pop,
        Opcode::Dup => dup,
        Opcode::Load => load,
        Opcode::BinOp => bin_op,
        Opcode::Add => |cpu, _| binary(cpu, |a, b| a + b),
        Opcode::Sub => |cpu, _| binary(cpu, |a, b| a - b),
        Opcode::Mul => |cpu, _| binary(cpu, |a, b| a * b),
        Opcode::Div => |cpu, _| binary(cpu, |a, b| a / b),
        Opcode::Sin => |cpu, _| unary(cpu, f64::sin),
        Opcode::Cos => |cpu, _| unary(cpu, f64::cos),
        Opcode::Sqrt => |cpu, _| unary(cpu, f64::sqrt),
        Opcode::Pw2 => |cpu, _| unary(cpu, |v| v * v),
        Opcode::PwNeg1 => |cpu, _| unary(cpu, f64::recip),
        Opcode::Abs => |cpu, _| unary(cpu, f64::abs),
        Opcode::In => input,
        Opcode::Out => output,
        Opcode::OutN => newline,
        Opcode::Jmp => jmp,
        Opcode::Ja => |cpu, _| branch_if(cpu, |second, first| second < first),
        Opcode::Jae => |cpu, _| branch_if(cpu, |second, first| second <= first),
        Opcode::Jb => |cpu, _| branch_if(cpu, |second, first| second > first),
        Opcode::Jbe => |cpu, _| branch_if(cpu, |second, first| second >= first),
        Opcode::Je => |cpu, _| branch_if(cpu, |second, first| (second - first).abs() <= EQ_EPSILON),
        Opcode::Jne => |cpu, _| branch_if(cpu, |second, first| (second - first).abs() > EQ_EPSILON),
        Opcode::Call => call,
        Opcode::Ret => ret,
        Opcode::GInit => g_init,
        Opcode::GDrawOn => |cpu, _| set_drawing(cpu, true),
        Opcode::GDrawOff => |cpu, _| set_drawing(cpu, false),
        Opcode::GDraw => g_draw,
        Opcode::GFill => g_fill,
        Opcode::StackSize => stack_size,
        Opcode::Halt => |_, _| Ok(Control::Halt),
    }
}

fn push(cpu: &mut Cpu, _: &mut dyn Host) -> Result<Control, Fault> {
    let value = cpu.stream.read_value()?;
    cpu.push(value)?;
    Ok(Control::Continue)
}

fn pop(cpu: &mut Cpu, _: &mut dyn Host) -> Result<Control, Fault> {
    let target = cpu.stream.read_target()?;
    let value = cpu.peek()?;
    cpu.memory.write(target, value)?;
    cpu.pop()?;
    Ok(Control::Continue)
}

fn dup(cpu: &mut Cpu, _: &mut dyn Host) -> Result<Control, Fault> {
    let top = cpu.stack.peek()?;
    cpu.push(top)?;
    Ok(Control::Continue)
}

fn load(cpu: &mut Cpu, _: &mut dyn Host) -> Result<Control, Fault> {
    let target = cpu.stream.read_target()?;
    let value = cpu.memory.read(target)?;
    cpu.push(value)?;
    Ok(Control::Continue)
}

fn bin_op(cpu: &mut Cpu, _: &mut dyn Host) -> Result<Control, Fault> {
    match cpu.stream.read_operator()? {
        b'+' => binary(cpu, |a, b| a + b),
        b'-' => binary(cpu, |a, b| a - b),
        b'*' => binary(cpu, |a, b| a * b),
        b'/' => binary(cpu, |a, b| a / b),
        b'$' => random(cpu),
        other => Err(Fault::InvalidOperator(other)),
    }
}

/// Uniform value between the two popped operands.
fn random(cpu: &mut Cpu) -> Result<Control, Fault> {
    let (second, first) = cpu.pop_pair()?;
    let value = cpu.rng.between(second, first);
    cpu.push(value)?;
    Ok(Control::Continue)
}

/// `second <op> first`, where `first` was on top.
fn binary(cpu: &mut Cpu, apply: impl Fn(f64, f64) -> f64) -> Result<Control, Fault> {
    let (second, first) = cpu.pop_pair()?;
    cpu.push(apply(second, first))?;
    Ok(Control::Continue)
}

fn unary(cpu: &mut Cpu, apply: impl Fn(f64) -> f64) -> Result<Control, Fault> {
    let value = cpu.pop()?;
    cpu.push(apply(value))?;
    Ok(Control::Continue)
}

fn input(cpu: &mut Cpu, host: &mut dyn Host) -> Result<Control, Fault> {
    let value = host.read_value()?;
    cpu.push(value)?;
    Ok(Control::Continue)
}

fn output(cpu: &mut Cpu, host: &mut dyn Host) -> Result<Control, Fault> {
    let value = cpu.peek()?;
    host.write_value(value)?;
    cpu.pop()?;
    Ok(Control::Continue)
}

fn newline(_: &mut Cpu, host: &mut dyn Host) -> Result<Control, Fault> {
    host.write_newline()?;
    Ok(Control::Continue)
}

fn jmp(cpu: &mut Cpu, _: &mut dyn Host) -> Result<Control, Fault> {
    Ok(Control::Jump(cpu.stream.read_address()?))
}

/// Pop `first`, then `second`, and jump when `taken(second, first)`.
fn branch_if(cpu: &mut Cpu, taken: impl Fn(f64, f64) -> bool) -> Result<Control, Fault> {
    let target = cpu.stream.read_address()?;
    cpu.stream.check_target(target)?;
    let (second, first) = cpu.pop_pair()?;
    if taken(second, first) {
        Ok(Control::Jump(target))
    } else {
        Ok(Control::Continue)
    }
}

fn call(cpu: &mut Cpu, _: &mut dyn Host) -> Result<Control, Fault> {
    let target = cpu.stream.read_address()?;
    cpu.stream.check_target(target)?;
    // Return addresses live on the operand stack as f64; reject positions
    // that would not come back exactly.
    let ret = cpu.stream.position() as f64;
    to_address(ret)?;
    cpu.push(ret)?;
    Ok(Control::Jump(target))
}

fn ret(cpu: &mut Cpu, _: &mut dyn Host) -> Result<Control, Fault> {
    let target = to_address(cpu.peek()?)?;
    cpu.stream.check_target(target)?;
    cpu.pop()?;
    Ok(Control::Jump(target))
}

fn g_init(cpu: &mut Cpu, host: &mut dyn Host) -> Result<Control, Fault> {
    let (width, height) = cpu.peek_pair()?;
    cpu.memory.init_screen(to_address(width)?, to_address(height)?)?;

    let (width, height) = cpu.memory.screen();
    tracing::debug!(width, height, "graphics init");
    host.graphics_init(width, height)?;
    cpu.pop_pair()?;
    Ok(Control::Continue)
}

fn set_drawing(cpu: &mut Cpu, on: bool) -> Result<Control, Fault> {
    cpu.graphics_active = on;
    Ok(Control::Continue)
}

fn g_draw(cpu: &mut Cpu, host: &mut dyn Host) -> Result<Control, Fault> {
    host.graphics_draw(cpu.frame())?;
    Ok(Control::Continue)
}

fn g_fill(cpu: &mut Cpu, _: &mut dyn Host) -> Result<Control, Fault> {
    let value = cpu.pop()?;
    cpu.memory.fill_vram(value);
    Ok(Control::Continue)
}

fn stack_size(cpu: &mut Cpu, host: &mut dyn Host) -> Result<Control, Fault> {
    host.write_text(&format!("Stack_size: {}\n", cpu.stack.size()))?;
    Ok(Control::Continue)
}
