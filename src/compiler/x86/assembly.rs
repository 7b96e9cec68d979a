use std::fmt::*;

/*
Assembly DSL
Registers are prefixed with %
Memory locations are within []
Each instruction is followed by a ;
Expressions to evaluate are in {}
Operands that were already built at runtime are wrapped in ()
prefix global labels with @ and local labels with ^
```
let x = 8;
assembly!(
    (buffer) {
        mov %eax, 4;
        mov %ebx, {x};
        mov [%ebp-4], %eax;
        jmp ^done;
    @label:
        mov %eax, %ebx;
    ^done:
        push (target);
    }
)
```

would translate to:
```
    mov eax, 4
    mov ebx, 8
    mov [ebp-4], eax
    jmp .done

label:
    mov eax, ebx
.done:
    push DWORD [x]
```

operand combinations:
binary:
%_, %_
%_, _
%_, @_
%_, [_]
[_], %_
but not [_], [_] as there are no x86 instructions that take two explicit memory operands

unary:
%_
@_
^_
[_]
_
*/

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg32 {
    Eax,
    Ebx,
    Edx,
    Esp,
    Ebp,
}

impl Display for Reg32 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Reg32::*;
        match self {
            Eax => f.write_str("eax"),
            Ebx => f.write_str("ebx"),
            Edx => f.write_str("edx"),
            Esp => f.write_str("esp"),
            Ebp => f.write_str("ebp"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DirectOperand {
    Integer(i32),
    Register(Reg32),
    Label(String),
}

impl Display for DirectOperand {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use DirectOperand::*;
        match self {
            Integer(i) => f.write_fmt(format_args!("{}", i)),
            Register(reg) => f.write_fmt(format_args!("{}", reg)),
            Label(lbl) => f.write_fmt(format_args!("{}", lbl)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Direct(DirectOperand),
    Memory(DirectOperand),
    MemoryAddr(Reg32, i32),
}

impl Operand {
    pub fn is_memory(&self) -> bool {
        match self {
            Operand::Memory(_) | Operand::MemoryAddr(..) => true,
            Operand::Direct(_) => false,
        }
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Operand::*;
        match self {
            Direct(d) => f.write_fmt(format_args!("{}", d)),
            Memory(mem) => f.write_fmt(format_args!("[{}]", mem)),
            MemoryAddr(mem, d) => {
                if *d < 0 {
                    f.write_fmt(format_args!("[{}-{}]", mem, -d))
                } else if *d > 0 {
                    f.write_fmt(format_args!("[{}+{}]", mem, d))
                } else {
                    f.write_fmt(format_args!("[{}]", mem))
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Inst {
    Comment(String),
    Extern(String),
    Section(String),
    Global(String),
    Data(String, i32),
    DataString(String, String),
    Label(String),

    Jmp(Operand),
    Je(Operand),
    Jne(Operand),
    Jl(Operand),
    Jle(Operand),
    Jg(Operand),
    Jge(Operand),
    Call(Operand),
    Ret,
    Cdq,

    Push(Operand),
    Pop(Operand),
    Mov(Operand, Operand),
    Lea(Operand, Operand),

    Add(Operand, Operand),
    Sub(Operand, Operand),
    IMul(Operand, Operand),
    IDiv(Reg32),

    Cmp(Operand, Operand),
}

impl Inst {
    /// Returns the name of the label this instruction defines, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Inst::Label(lbl) | Inst::Data(lbl, _) | Inst::DataString(lbl, _) => Some(lbl),
            _ => None,
        }
    }
}

impl Display for Inst {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Inst::*;
        // Add separating newline?
        match self {
            Label(lbl) if !lbl.starts_with(".") => f.write_str("\n")?,
            _ => f.write_str("")?,
        };

        // Indent instruction?
        match self {
            Label(_) | Global(_) | Section(_) | Extern(_) => (),
            _ => f.write_str("    ")?,
        };

        match self {
            Comment(comment) => f.write_fmt(format_args!("; {}", comment)),
            Extern(ext) => f.write_fmt(format_args!("extern {}", ext)),
            Section(section) => f.write_fmt(format_args!("\nsection {}", section)),
            Global(global) => f.write_fmt(format_args!("global {}", global)),
            Data(lbl, value) => f.write_fmt(format_args!("{}: dd {}", lbl, value)),
            DataString(lbl, value) => f.write_fmt(format_args!("{}: db `{}`,0", lbl, value)),

            Jmp(a) => f.write_fmt(format_args!("jmp {}", a)),
            Je(a) => f.write_fmt(format_args!("je {}", a)),
            Jne(a) => f.write_fmt(format_args!("jne {}", a)),
            Jl(a) => f.write_fmt(format_args!("jl {}", a)),
            Jle(a) => f.write_fmt(format_args!("jle {}", a)),
            Jg(a) => f.write_fmt(format_args!("jg {}", a)),
            Jge(a) => f.write_fmt(format_args!("jge {}", a)),
            Call(a) => f.write_fmt(format_args!("call {}", a)),
            Ret => f.write_str("ret"),
            Cdq => f.write_str("cdq"),

            Push(a) if a.is_memory() => f.write_fmt(format_args!("push DWORD {}", a)),
            Push(a) => f.write_fmt(format_args!("push {}", a)),
            Pop(a) => f.write_fmt(format_args!("pop {}", a)),

            Mov(a, b) => f.write_fmt(format_args!(
                "mov {}, {}",
                a,
                match b {
                    Operand::Direct(DirectOperand::Integer(_))
                    | Operand::Memory(_)
                    | Operand::MemoryAddr(_, _) => format!("DWORD {}", b),
                    _ => format!("{}", b),
                }
            )),
            Lea(a, b) => f.write_fmt(format_args!("lea {}, {}", a, b)),
            Add(a, b) => f.write_fmt(format_args!("add {}, {}", a, b)),
            Sub(a, b) => f.write_fmt(format_args!("sub {}, {}", a, b)),
            IMul(a, b) => f.write_fmt(format_args!("imul {}, {}", a, b)),
            IDiv(a) => f.write_fmt(format_args!("idiv {}", a)),
            Cmp(a, b) => f.write_fmt(format_args!("cmp {}, {}", a, b)),

            Label(lbl) => f.write_fmt(format_args!("{}:", lbl)),
        }
    }
}

#[macro_export]
macro_rules! unit_op {
    (ret) => {
        Inst::Ret
    };
    (cdq) => {
        Inst::Cdq
    };
}

#[macro_export]
macro_rules! unary_op {
    (jmp) => {
        Inst::Jmp
    };
    (je) => {
        Inst::Je
    };
    (jne) => {
        Inst::Jne
    };
    (jl) => {
        Inst::Jl
    };
    (jle) => {
        Inst::Jle
    };
    (jg) => {
        Inst::Jg
    };
    (jge) => {
        Inst::Jge
    };
    (call) => {
        Inst::Call
    };
    (push) => {
        Inst::Push
    };
    (pop) => {
        Inst::Pop
    };
}

#[macro_export]
macro_rules! binary_op {
    (mov) => {
        Inst::Mov
    };
    (lea) => {
        Inst::Lea
    };
    (add) => {
        Inst::Add
    };
    (sub) => {
        Inst::Sub
    };
    (imul) => {
        Inst::IMul
    };
    (cmp) => {
        Inst::Cmp
    };
}

#[macro_export]
macro_rules! register {
    (eax) => {
        Reg32::Eax
    };
    (ebx) => {
        Reg32::Ebx
    };
    (edx) => {
        Reg32::Edx
    };
    (esp) => {
        Reg32::Esp
    };
    (ebp) => {
        Reg32::Ebp
    };
}

#[macro_export]
macro_rules! operand {
    // prebuilt
    (($e:expr)) => {
        $e
    };

    // memory
    ([%$e:tt]) => {
        Operand::Memory(DirectOperand::Register(register!($e)))
    };
    ([%$reg:tt-$d:literal]) => {
        Operand::MemoryAddr(register!($reg), -$d)
    };
    ([%$reg:tt+$d:literal]) => {
        Operand::MemoryAddr(register!($reg), $d)
    };
    ([%$reg:tt-{$e:expr}]) => {
        Operand::MemoryAddr(register!($reg), -$e)
    };
    ([%$reg:tt+{$e:expr}]) => {
        Operand::MemoryAddr(register!($reg), $e)
    };
    ([@ {$e:expr}]) => {
        Operand::Memory(DirectOperand::Label($e.into()))
    };
    ([@ $e:tt]) => {
        Operand::Memory(DirectOperand::Label(stringify!($e).into()))
    };
    ({$e:expr}) => {
        Operand::Direct(DirectOperand::Integer($e))
    };

    // register
    (%$reg:tt) => {
        Operand::Direct(DirectOperand::Register(register!($reg)))
    };
    ($e:literal) => {
        Operand::Direct(DirectOperand::Integer($e))
    };
    (@{$e:expr}) => {
        Operand::Direct(DirectOperand::Label($e.into()))
    };
    (@$e:tt) => {
        Operand::Direct(DirectOperand::Label(stringify!($e).into()))
    };
    (^{$e:expr}) => {
        Operand::Direct(DirectOperand::Label(format!(".{}", $e)))
    };
    (^$e:tt) => {
        Operand::Direct(DirectOperand::Label(format!(".{}", stringify!($e))))
    };
}

#[macro_export]
macro_rules! assembly {
    (($buf:expr) {}) => {
    };

    /********************/
    /*  MACRO OPERATIONS */
    /********************/
    // Append another set of instructions
    (($buf:expr) {{{$is:expr}} $($tail:tt)*}) => {
        for inst in $is.iter() {
            $buf.push(inst.clone());
        }
        assembly!(($buf) {$($tail)*})
    };

    /********************/
    /*     COMMENTS       */
    /********************/
    (($buf:expr) {;$comment:literal $($tail:tt)*}) => {
        $buf.push(Inst::Comment($comment.into()));
        assembly!(($buf) {$($tail)*})
    };

    (($buf:expr) {;{$comment:expr} $($tail:tt)*}) => {
        $buf.push(Inst::Comment($comment.into()));
        assembly!(($buf) {$($tail)*})
    };

    /********************/
    /*     LABELS       */
    /********************/
    (($buf:expr) {^{$label:expr}: $($tail:tt)*}) => {
        $buf.push(Inst::Label(format!(".{}", $label)));
        assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {^$label:tt: $($tail:tt)*}) => {
        $buf.push(Inst::Label(format!(".{}", stringify!($label))));
        assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {@{$label:expr}: $($tail:tt)*}) => {
        $buf.push(Inst::Label($label.into()));
        assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {@$label:tt: $($tail:tt)*}) => {
        $buf.push(Inst::Label(stringify!($label).into()));
        assembly!(($buf) {$($tail)*})
    };

    /********************/
    /* UNIT OPERATORS */
    /********************/
    (($buf:expr) {$inst:tt; $($tail:tt)*}) => {
        $buf.push(unit_op!($inst));
        assembly!(($buf) {$($tail)*})
    };

    /********************/
    /* Special Ops      */
    /********************/
    (($buf:expr) {section $s:literal; $($tail:tt)*}) => {
        $buf.push(Inst::Section($s.into()));
        assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {global $glbl:tt; $($tail:tt)*}) => {
        $buf.push(Inst::Global(stringify!($glbl).into()));
        assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {extern $ext:tt; $($tail:tt)*}) => {
        $buf.push(Inst::Extern(stringify!($ext).into()));
        assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {idiv % $a:tt; $($tail:tt)*}) => {
        $buf.push(Inst::IDiv(register!($a)));
        assembly!(($buf) {$($tail)*})
    };

    /********************/
    /* UNARY OPERATORS */
    /********************/
    (($buf:expr) {$inst:tt $a:tt; $($tail:tt)*}) => {
        $buf.push(unary_op!($inst)(operand!($a)));
        assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {$inst:tt % $a:tt; $($tail:tt)*}) => {
        $buf.push(unary_op!($inst)(operand!(%$a)));
        assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {$inst:tt [ $($mem:tt)+ ]; $($tail:tt)*}) => {
        $buf.push(unary_op!($inst)(operand!([$($mem)+])));
        assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {$inst:tt @ $a:tt; $($tail:tt)*}) => {
        $buf.push(unary_op!($inst)(operand!(@$a)));
        assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {$inst:tt ^ $a:tt; $($tail:tt)*}) => {
        $buf.push(unary_op!($inst)(operand!(^$a)));
        assembly!(($buf) {$($tail)*})
    };

    /********************/
    /* BINARY OPERATORS */
    /********************/
    // reg, literal
    (($buf:expr) {$inst:tt % $a:tt, $b:tt; $($tail:tt)*}) => {
        $buf.push(binary_op!($inst)(operand!(% $a), operand!($b)));
        assembly!(($buf) {$($tail)*})
    };
    // reg, reg
    (($buf:expr) {$inst:tt % $a:tt, % $b:tt; $($tail:tt)*}) => {
        $buf.push(binary_op!($inst)(operand!(% $a), operand!(% $b)));
        assembly!(($buf) {$($tail)*})
    };
    // reg, global label
    (($buf:expr) {$inst:tt % $a:tt, @ $b:tt; $($tail:tt)*}) => {
        $buf.push(binary_op!($inst)(operand!(% $a), operand!(@ $b)));
        assembly!(($buf) {$($tail)*})
    };
    // reg, mem
    (($buf:expr) {$inst:tt % $a:tt, [ $($mem:tt)+ ]; $($tail:tt)*}) => {
        $buf.push(binary_op!($inst)(operand!(%$a),  operand!([$($mem)+])));
        assembly!(($buf) {$($tail)*})
    };
    // mem, reg
    (($buf:expr) {$inst:tt [$($a:tt)+], % $b:tt; $($tail:tt)*}) => {
        $buf.push(binary_op!($inst)(operand!([$($a)+]), operand!(% $b)));
        assembly!(($buf) {$($tail)*})
    };
    // prebuilt, reg
    (($buf:expr) {$inst:tt ($a:expr), % $b:tt; $($tail:tt)*}) => {
        $buf.push(binary_op!($inst)($a, operand!(% $b)));
        assembly!(($buf) {$($tail)*})
    };
}
