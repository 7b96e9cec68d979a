//! A small interpreter for emitted instruction streams, used by tests to check
//! generated code by running it rather than by matching its text.

use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};

use super::assembly::*;

const DATA_BASE: i32 = 0x1000;
const HEAP_BASE: i32 = 0x40000;
const STACK_TOP: i32 = 0x80000;
const RETURN_SENTINEL: i32 = -1;
const STEP_LIMIT: usize = 1_000_000;

/// The symbol a NASM identifier names.  `$x` and `x` are the same symbol.
fn symbol(name: &str) -> &str {
    name.strip_prefix('$').unwrap_or(name)
}

pub struct Machine<'a> {
    code: &'a [Inst],
    labels: HashMap<String, usize>,
    symbols: HashMap<String, i32>,
    strings: HashMap<i32, String>,
    registers: HashMap<Reg32, i32>,
    memory: HashMap<i32, i32>,
    flags: Ordering,
    pc: usize,
    heap: i32,
    input: VecDeque<i32>,
    pub output: String,
    pub calls: Vec<String>,
}

impl<'a> Machine<'a> {
    /// Loads a program.  Panics if a label is defined twice.
    pub fn new(code: &'a [Inst]) -> Machine<'a> {
        let mut labels = HashMap::new();
        let mut symbols = HashMap::new();
        let mut strings = HashMap::new();
        let mut memory = HashMap::new();
        let mut next_data = DATA_BASE;

        for (idx, inst) in code.iter().enumerate() {
            match inst {
                Inst::Label(lbl) => {
                    if labels.insert(symbol(lbl).to_string(), idx).is_some() {
                        panic!("Label {} defined twice", lbl)
                    }
                }
                Inst::Data(lbl, value) => {
                    if symbols.insert(symbol(lbl).to_string(), next_data).is_some() {
                        panic!("Data {} defined twice", lbl)
                    }
                    memory.insert(next_data, *value);
                    next_data += 4;
                }
                Inst::DataString(lbl, s) => {
                    if symbols.insert(lbl.clone(), next_data).is_some() {
                        panic!("Data {} defined twice", lbl)
                    }
                    strings.insert(next_data, s.replace("\\n", "\n"));
                    next_data += (s.len() as i32 / 4 + 1) * 4;
                }
                _ => (),
            }
        }

        let mut registers = HashMap::new();
        registers.insert(Reg32::Esp, STACK_TOP);
        registers.insert(Reg32::Ebp, STACK_TOP);

        Machine {
            code,
            labels,
            symbols,
            strings,
            registers,
            memory,
            flags: Ordering::Equal,
            pc: 0,
            heap: HEAP_BASE,
            input: VecDeque::new(),
            output: String::new(),
            calls: vec![],
        }
    }

    /// Values that `scanf` will read, in order.
    pub fn with_input(mut self, input: &[i32]) -> Self {
        self.input = input.iter().copied().collect();
        self
    }

    /// Calls the routine at `entry` and runs until it returns. Returns `eax`.
    pub fn call(&mut self, entry: &str) -> i32 {
        self.push(RETURN_SENTINEL);
        self.pc = self.target(entry);
        self.execute(|m| m.pc == RETURN_SENTINEL as usize);
        self.reg(Reg32::Eax)
    }

    /// Runs straight through the code from the first instruction to the last.
    pub fn run(&mut self) {
        self.pc = 0;
        let len = self.code.len();
        self.execute(move |m| m.pc >= len);
    }

    pub fn reg(&self, reg: Reg32) -> i32 {
        *self.registers.get(&reg).unwrap_or(&0)
    }

    pub fn esp(&self) -> i32 {
        self.reg(Reg32::Esp)
    }

    pub fn global(&self, name: &str) -> i32 {
        self.load(self.data_address(name))
    }

    pub fn load(&self, addr: i32) -> i32 {
        *self.memory.get(&addr).unwrap_or(&0)
    }

    pub fn pop(&mut self) -> i32 {
        let esp = self.esp();
        let v = self.load(esp);
        self.registers.insert(Reg32::Esp, esp + 4);
        v
    }

    pub fn push(&mut self, v: i32) {
        let esp = self.esp() - 4;
        self.registers.insert(Reg32::Esp, esp);
        self.memory.insert(esp, v);
    }

    fn execute<F: Fn(&Self) -> bool>(&mut self, done: F) {
        let mut steps = 0;
        while !done(self) {
            steps += 1;
            if steps > STEP_LIMIT {
                panic!("Program did not halt")
            }
            if self.pc >= self.code.len() {
                panic!("Ran off the end of the program")
            }
            self.step();
        }
    }

    fn data_address(&self, name: &str) -> i32 {
        match self.symbols.get(symbol(name)) {
            Some(addr) => *addr,
            None => panic!("Unknown data {}", name),
        }
    }

    fn target(&self, label: &str) -> usize {
        match self.labels.get(symbol(label)) {
            Some(idx) => *idx,
            None => panic!("Unknown label {}", label),
        }
    }

    fn jump_target(&self, op: &Operand) -> usize {
        match op {
            Operand::Direct(DirectOperand::Label(lbl)) => self.target(lbl),
            _ => panic!("Invalid jump target {}", op),
        }
    }

    fn address(&self, op: &Operand) -> i32 {
        match op {
            Operand::Memory(DirectOperand::Register(r)) => self.reg(*r),
            Operand::Memory(DirectOperand::Label(lbl)) => self.data_address(lbl),
            Operand::MemoryAddr(r, d) => self.reg(*r) + d,
            _ => panic!("{} is not a memory operand", op),
        }
    }

    fn read(&self, op: &Operand) -> i32 {
        match op {
            Operand::Direct(DirectOperand::Integer(i)) => *i,
            Operand::Direct(DirectOperand::Register(r)) => self.reg(*r),
            Operand::Direct(DirectOperand::Label(lbl)) => self.data_address(lbl),
            _ => self.load(self.address(op)),
        }
    }

    fn write(&mut self, op: &Operand, v: i32) {
        match op {
            Operand::Direct(DirectOperand::Register(r)) => {
                self.registers.insert(*r, v);
            }
            Operand::Direct(_) => panic!("Cannot write to {}", op),
            _ => {
                let addr = self.address(op);
                self.memory.insert(addr, v);
            }
        }
    }

    fn step(&mut self) {
        let inst = self.code[self.pc].clone();
        self.pc += 1;

        match &inst {
            Inst::Comment(_)
            | Inst::Extern(_)
            | Inst::Section(_)
            | Inst::Global(_)
            | Inst::Data(..)
            | Inst::DataString(..)
            | Inst::Label(_) => (),
            Inst::Jmp(t) => self.pc = self.jump_target(t),
            Inst::Je(t) => self.jump_if(t, |o| o == Ordering::Equal),
            Inst::Jne(t) => self.jump_if(t, |o| o != Ordering::Equal),
            Inst::Jl(t) => self.jump_if(t, |o| o == Ordering::Less),
            Inst::Jle(t) => self.jump_if(t, |o| o != Ordering::Greater),
            Inst::Jg(t) => self.jump_if(t, |o| o == Ordering::Greater),
            Inst::Jge(t) => self.jump_if(t, |o| o != Ordering::Less),
            Inst::Call(Operand::Direct(DirectOperand::Label(name))) => {
                self.calls.push(symbol(name).to_string());
                match symbol(name) {
                    "printf" => self.printf(),
                    "scanf" => self.scanf(),
                    "calloc" => self.calloc(),
                    _ => {
                        self.push(self.pc as i32);
                        self.pc = self.target(name);
                    }
                }
            }
            Inst::Call(op) => panic!("Invalid call target {}", op),
            Inst::Ret => self.pc = self.pop() as usize,
            Inst::Cdq => {
                let edx = if self.reg(Reg32::Eax) < 0 { -1 } else { 0 };
                self.registers.insert(Reg32::Edx, edx);
            }
            Inst::Push(a) => {
                let v = self.read(a);
                self.push(v)
            }
            Inst::Pop(a) => {
                let v = self.pop();
                self.write(a, v)
            }
            Inst::Mov(a, b) => {
                let v = self.read(b);
                self.write(a, v)
            }
            Inst::Lea(a, b) => {
                let v = self.address(b);
                self.write(a, v)
            }
            Inst::Add(a, b) => {
                let v = self.read(a).wrapping_add(self.read(b));
                self.write(a, v)
            }
            Inst::Sub(a, b) => {
                let v = self.read(a).wrapping_sub(self.read(b));
                self.write(a, v)
            }
            Inst::IMul(a, b) => {
                let v = self.read(a).wrapping_mul(self.read(b));
                self.write(a, v)
            }
            Inst::IDiv(r) => {
                let divisor = self.reg(*r);
                if divisor == 0 {
                    panic!("Division by zero")
                }
                let eax = self.reg(Reg32::Eax);
                self.registers.insert(Reg32::Eax, eax.wrapping_div(divisor));
                self.registers.insert(Reg32::Edx, eax.wrapping_rem(divisor));
            }
            Inst::Cmp(a, b) => self.flags = self.read(a).cmp(&self.read(b)),
        }
    }

    fn jump_if<F: Fn(Ordering) -> bool>(&mut self, t: &Operand, cond: F) {
        if cond(self.flags) {
            self.pc = self.jump_target(t);
        }
    }

    fn arg(&self, n: i32) -> i32 {
        self.load(self.esp() + 4 * n)
    }

    fn format_string(&self) -> String {
        match self.strings.get(&self.arg(0)) {
            Some(s) => s.clone(),
            None => panic!("No format string at {}", self.arg(0)),
        }
    }

    fn printf(&mut self) {
        let fmt = self.format_string();
        let mut out = String::new();
        let mut pieces = fmt.split("%d");
        out.push_str(pieces.next().unwrap_or(""));
        for (n, piece) in pieces.enumerate() {
            out.push_str(&self.arg(n as i32 + 1).to_string());
            out.push_str(piece);
        }
        self.registers.insert(Reg32::Eax, out.len() as i32);
        self.output.push_str(&out);
    }

    fn scanf(&mut self) {
        let fmt = self.format_string();
        let count = fmt.matches("%d").count() as i32;
        for n in 0..count {
            let addr = self.arg(n + 1);
            let v = self.input.pop_front().expect("scanf ran out of input");
            self.memory.insert(addr, v);
        }
        self.registers.insert(Reg32::Eax, count);
    }

    fn calloc(&mut self) {
        let bytes = self.arg(0) * self.arg(1);
        let addr = self.heap;
        self.heap += (bytes + 3) / 4 * 4;
        self.registers.insert(Reg32::Eax, addr);
    }
}
