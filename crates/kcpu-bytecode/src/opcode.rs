//! Opcode definitions.
//!
//! The [`for_each_opcode!`](crate::for_each_opcode) macro holds the canonical
//! opcode list and hands it to a callback macro for code generation, so the
//! interpreter, the builder and the dump all agree on numbering without
//! repeating it.
//!
//! # Encoding
//!
//! Every instruction starts with a 1-byte opcode, followed by the operand its
//! [`OperandKind`] declares:
//! - `Constant`: 8-byte `f64`
//! - `Target`: 1-byte region tag, then a 1-byte register index (registers)
//!   or an 8-byte `f64` cell index (RAM, VRAM)
//! - `Label`: 8-byte `u64` byte offset
//! - `Operator`: 1 ASCII byte (`+`, `-`, `*`, `/`)

use std::fmt;

/// Invokes a callback macro with the complete opcode list.
///
/// Each entry reads `Variant = code, "mnemonic", operand kind, stack inputs;`
/// where stack inputs is the number of operand-stack values the instruction
/// consumes before it can run.
#[macro_export]
macro_rules! for_each_opcode {
    ($callback:ident) => {
        $callback! {
            // =========================
            // Stack and memory
            // =========================
            /// push <value> ; push a constant
            Push = 1, "push", Constant, 0;
            /// pop <target> ; pop into a register, RAM or VRAM cell
            Pop = 2, "pop", Target, 1;
            /// dup ; duplicate the top value
            Dup = 3, "dup", None, 1;
            /// load <target> ; push a register, RAM or VRAM cell
            Load = 4, "load", Target, 0;
            // =========================
            // Arithmetic
            // =========================
            /// bin_op <op> ; second <op> first, op is one of + - * /
            BinOp = 10, "bin_op", Operator, 2;
            /// add ; second + first
            Add = 11, "add", None, 2;
            /// sub ; second - first
            Sub = 12, "sub", None, 2;
            /// mul ; second * first
            Mul = 13, "mul", None, 2;
            /// div ; second / first
            Div = 14, "div", None, 2;
            /// sin ; top = sin(top)
            Sin = 20, "sin", None, 1;
            /// cos ; top = cos(top)
            Cos = 21, "cos", None, 1;
            /// sqrt ; top = sqrt(top)
            Sqrt = 22, "sqrt", None, 1;
            /// pw2 ; top = top * top
            Pw2 = 23, "pw2", None, 1;
            /// pw_1 ; top = 1 / top
            PwNeg1 = 24, "pw_1", None, 1;
            /// abs ; top = |top|
            Abs = 25, "abs", None, 1;
            // =========================
            // Input / output
            // =========================
            /// in ; read a value from the host, push it
            In = 50, "in", None, 0;
            /// out ; pop and print followed by a space
            Out = 51, "out", None, 1;
            /// out_n ; print a newline
            OutN = 52, "out_n", None, 0;
            // =========================
            // Control flow
            // =========================
            /// jmp <label> ; unconditional jump
            Jmp = 101, "jmp", Label, 0;
            /// ja <label> ; jump if second < first
            Ja = 102, "ja", Label, 2;
            /// jae <label> ; jump if second <= first
            Jae = 103, "jae", Label, 2;
            /// jb <label> ; jump if second > first
            Jb = 104, "jb", Label, 2;
            /// jbe <label> ; jump if second >= first
            Jbe = 105, "jbe", Label, 2;
            /// je <label> ; jump if |second - first| <= epsilon
            Je = 106, "je", Label, 2;
            /// jne <label> ; jump if |second - first| > epsilon
            Jne = 107, "jne", Label, 2;
            /// call <label> ; push the return address, jump
            Call = 108, "call", Label, 0;
            /// ret ; pop the return address, jump
            Ret = 109, "ret", None, 1;
            // =========================
            // Graphics
            // =========================
            /// g_init ; pop height then width, reset VRAM to width x height
            GInit = 200, "g_init", None, 2;
            /// g_draw_on ; render after every step
            GDrawOn = 201, "g_draw_on", None, 0;
            /// g_draw_off ; stop rendering after every step
            GDrawOff = 202, "g_draw_off", None, 0;
            /// g_draw ; render VRAM once
            GDraw = 210, "g_draw", None, 0;
            /// g_fill ; pop a value, fill VRAM with it
            GFill = 211, "g_fill", None, 1;
            // =========================
            // Diagnostics
            // =========================
            /// stack_size ; print the operand stack size
            StackSize = 250, "stack_size", None, 0;
            /// halt ; stop execution
            Halt = 255, "halt", None, 0;
        }
    };
}

/// Kind of stream operand that follows an opcode byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandKind {
    None,
    Constant,
    Target,
    Label,
    Operator,
}

/// Memory region selected by the tag byte of a `Target` operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Region {
    Register = 32,
    Ram = 48,
    Vram = 64,
}

impl Region {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            32 => Some(Self::Register),
            48 => Some(Self::Ram),
            64 => Some(Self::Vram),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Ram => "ram",
            Self::Vram => "vram",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! define_opcodes {
    ($(
        $(#[$doc:meta])*
        $variant:ident = $code:literal, $name:literal, $operand:ident, $inputs:literal;
    )*) => {
        /// Instruction opcodes.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum Opcode {
            $(
                $(#[$doc])*
                $variant = $code,
            )*
        }

        impl Opcode {
            /// Every opcode, in declaration order.
            pub const ALL: &'static [Opcode] = &[$(Opcode::$variant,)*];

            pub fn from_byte(byte: u8) -> Option<Self> {
                match byte {
                    $($code => Some(Self::$variant),)*
                    _ => None,
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Mnemonic.
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Stream operand that follows the opcode byte.
            pub fn operand(self) -> OperandKind {
                match self {
                    $(Self::$variant => OperandKind::$operand,)*
                }
            }

            /// Operand-stack values consumed by the instruction.
            pub fn stack_inputs(self) -> usize {
                match self {
                    $(Self::$variant => $inputs,)*
                }
            }
        }
    };
}

crate::for_each_opcode!(define_opcodes);

impl Opcode {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether the instruction may redirect the instruction pointer.
    pub fn is_branch(self) -> bool {
        self.operand() == OperandKind::Label || self == Self::Ret
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
