use crate::compiler::ast::{Expression, Item, Statement, Type};
use crate::compiler::semantics::{Mismatch, TranslationError};
use crate::compiler::x86::assembly::Inst;
use crate::compiler::x86::simulator::Machine;
use crate::compiler::{compile, parse, tokenize, CompileError};

use super::{Descriptor, Translator};

fn parse_expression(text: &str) -> Expression {
    let tokens = tokenize(&format!("{};", text)).unwrap();
    let mut program = parse(&tokens).unwrap();
    match program.items.remove(0) {
        Item::Statement(Statement::Expression(_, e)) => e,
        item => panic!("Expected an expression statement, got {:?}", item),
    }
}

/// Evaluates `text` with the globals `x` and `y` set to the given values
/// and the global `p` pointing at `x`.  Returns the value of the expression
/// and the number of bytes the evaluation left on the stack.
fn evaluate(x: i32, y: i32, text: &str) -> (i32, i32) {
    let mut t = Translator::new();
    for (name, ty, value) in vec![("x", Type::Int, x), ("y", Type::Int, y)] {
        t.declare_variable(name, ty.clone()).unwrap();
        let target = t.identifier(name).unwrap();
        t.assign(target, Descriptor::Immediate(ty, value)).unwrap();
    }
    t.declare_variable("p", Type::Int.pointer_to()).unwrap();
    let x = t.identifier("x").unwrap();
    let address = t.address_of(x).unwrap();
    let p = t.identifier("p").unwrap();
    t.assign(p, address).unwrap();

    let result = t.expression(&parse_expression(text)).unwrap();
    t.materialize(result);

    let code: Vec<Inst> = t
        .code()
        .data()
        .iter()
        .chain(t.code().init().iter())
        .cloned()
        .collect();
    let mut m = Machine::new(&code);
    let start = m.esp();
    m.run();
    let depth = start - m.esp();
    (m.pop(), depth)
}

fn run(text: &str) -> (i32, String) {
    run_with_input(text, &[])
}

fn run_with_input(text: &str, input: &[i32]) -> (i32, String) {
    let asm = compile(text).unwrap();
    let mut m = Machine::new(asm.instructions()).with_input(input);
    let start = m.esp();
    let result = m.call("main");
    assert_eq!(m.esp(), start, "main left the stack unbalanced");
    (result, m.output.clone())
}

fn translation_error(text: &str) -> (u32, TranslationError) {
    match compile(text) {
        Err(CompileError::Translation(e)) => (e.line(), e.inner()),
        Err(e) => panic!("Expected a translation error, got {}", e),
        Ok(_) => panic!("Expected a translation error"),
    }
}

#[test]
fn each_expression_leaves_one_value() {
    for (text, expected) in vec![
        ("1 + 2 * 3", 7),
        ("x - y / 2", 9),
        ("(x + y) * (x - y)", 96),
        ("x % 3 + -y", -1),
        ("-7 / 2", -3),
        ("-7 % 2", -1),
        ("!x || y && x", 1),
        ("!(x && 0)", 1),
        ("(x < y) == (y > x)", 1),
        ("x = y = 7", 7),
        ("*p + 1", 11),
        ("*p = 4", 4),
        ("p = &y", 0x1004),
        ("*&x", 10),
        ("x == 10 && y != 0 || 0", 1),
    ] {
        assert_eq!(evaluate(10, 2, text), (expected, 4), "{}", text);
    }
}

fn compare(op: &str, a: i32, b: i32) -> bool {
    match op {
        "<" => a < b,
        "<=" => a <= b,
        ">" => a > b,
        ">=" => a >= b,
        "==" => a == b,
        "!=" => a != b,
        _ => panic!("Unknown operator {}", op),
    }
}

#[test]
fn relational_boundaries() {
    for (x, y) in vec![(5, 5), (6, 5), (4, 5), (-1, 0), (0, -1)] {
        for op in vec!["<", "<=", ">", ">=", "==", "!="] {
            let text = format!("x {} y", op);
            assert_eq!(
                evaluate(x, y, &text),
                (compare(op, x, y) as i32, 4),
                "x={}, y={}: {}",
                x,
                y,
                text
            );
        }
    }
}

#[test]
fn labels_are_unique() {
    let asm = compile(
        "int g(int a) {
            if (a < 1 && a > -1) { return 0; }
            while (a > 0 || a < -5) { a = a - 1; if (a == 3) { return a; } else { a = a - 1; } }
            return !a;
        }
        int main() {
            int i = 0;
            while (i < 3) { if (i != 1 || i == 2) { g(i); } i = i + 1; }
            return g(8) == 3;
        }",
    )
    .unwrap();

    let mut labels: Vec<&str> = asm
        .instructions()
        .iter()
        .filter_map(|i| match i {
            Inst::Label(l) => Some(l.as_str()),
            _ => None,
        })
        .collect();
    let count = labels.len();
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), count);

    let mut m = Machine::new(asm.instructions());
    assert_eq!(m.call("main"), 1);
}

#[test]
fn globals_and_branch() {
    let text = "int x = 3; int y = 4;
        if (x < y) { printf(\"yes\"); } else { printf(\"no\"); }
        int main() { return 0; }";
    let asm = compile(text).unwrap();
    let listing = asm.to_string();
    assert!(listing.contains("    $x: dd 0\n"), "{}", listing);
    assert!(listing.contains("    $y: dd 0\n"), "{}", listing);

    let mut m = Machine::new(asm.instructions());
    assert_eq!(m.call("main"), 0);
    assert_eq!(m.output, "yes");
    assert_eq!(m.global("x"), 3);
    assert_eq!(m.global("y"), 4);
    assert_eq!(m.calls, vec!["__globals_init", "printf"]);
}

#[test]
fn call_with_one_argument() {
    let asm = compile("int f(int n) { return n * 2; } int main() { return f(5); }").unwrap();
    let lines: Vec<String> = asm.instructions().iter().map(|i| i.to_string()).collect();

    let call = lines.iter().position(|l| l == "    call $f").unwrap();
    assert_eq!(lines[call - 1], "    push 5");
    assert_eq!(lines[call + 1], "    add esp, 4");

    let f = lines.iter().position(|l| l == "\n$f:").unwrap();
    assert!(lines[f..call]
        .iter()
        .any(|l| l == "    mov eax, DWORD [ebp+8]"));

    let mut m = Machine::new(asm.instructions());
    assert_eq!(m.call("main"), 10);
}

#[test]
fn globals_initialize_once() {
    let (r, out) = run(
        "int c = 0;
        printf(\"init\");
        int main() { c = c + 1; if (c < 3) { main(); } return c; }",
    );
    assert_eq!((r, out.as_str()), (3, "init"));
}

#[test]
fn register_names_are_identifiers() {
    let asm = compile("int eax; int ebx() { return 2; } int main() { eax = ebx(); return eax; }")
        .unwrap();
    let listing = asm.to_string();
    for expected in vec!["    $eax: dd 0\n", "\n$ebx:\n", "    call $ebx\n", "[$eax]"] {
        assert!(listing.contains(expected), "{} in {}", expected, listing);
    }

    let mut m = Machine::new(asm.instructions());
    assert_eq!(m.call("main"), 2);
    assert_eq!(m.global("eax"), 2);
}

#[test]
fn one_epilogue_per_function() {
    let asm = compile(
        "int f(int n) { if (n > 0) { return 1; } return 0; }
        void g() { }
        int main() { g(); return f(3); }",
    )
    .unwrap();
    let lines: Vec<String> = asm.instructions().iter().map(|i| i.to_string()).collect();
    let rets = |from: &str, to: Option<&str>| {
        let start = lines.iter().position(|l| l == from).unwrap();
        let end = to.map_or(lines.len(), |to| lines.iter().position(|l| l == to).unwrap());
        lines[start..end].iter().filter(|l| *l == "    ret").count()
    };
    assert_eq!(rets("\n$f:", Some("\n$g:")), 2);
    assert_eq!(rets("\n$g:", Some("\n$main:")), 1);
    assert_eq!(rets("\n$main:", None), 1);
    assert_eq!(lines.last().map(|l| l.as_str()), Some("    ret"));

    let mut m = Machine::new(asm.instructions());
    assert_eq!(m.call("main"), 1);
}

#[test]
fn arguments_bind_in_order() {
    let (r, _) = run("int sub(int a, int b) { return a - b; } int main() { return sub(10, 3); }");
    assert_eq!(r, 7);

    let (r, out) = run("int main() { printf(\"%d-%d\\n\", 1, 2); return 0; }");
    assert_eq!((r, out.as_str()), (0, "1-2\n"));
}

#[test]
fn recursion() {
    let (r, _) = run(
        "int fact(int n);
        int main() { return fact(5); }
        int fact(int n) { if (n <= 1) { return 1; } return n * fact(n - 1); }",
    );
    assert_eq!(r, 120);
}

#[test]
fn locals_shadow_globals() {
    let (r, _) = run("int x = 1; int main() { int x; x = 5; return x; }");
    assert_eq!(r, 5);

    let (r, _) = run("int x = 1; void set() { int x; x = 5; } int main() { set(); return x; }");
    assert_eq!(r, 1);
}

#[test]
fn duplicate_local() {
    let (line, err) = translation_error("int main() {\n int a;\n int a;\n return 0;\n}");
    assert_eq!(line, 3);
    assert_eq!(err, TranslationError::Redeclaration("a".into()));
}

#[test]
fn arrays() {
    let (r, _) = run(
        "int main() {
            int n = 3;
            int a[n];
            int i = 0;
            while (i < n) { a[i] = i * i; i = i + 1; }
            return a[0] + a[1] + a[2];
        }",
    );
    assert_eq!(r, 5);

    let (r, _) = run("int g[4]; int main() { g[3] = 9; return g[3] + g[0]; }");
    assert_eq!(r, 9);
}

#[test]
fn pointers() {
    let (r, _) = run(
        "void set(int *p, int v) { *p = v; }
        int main() { int x; int *q; q = &x; set(q, 9); return *q + x; }",
    );
    assert_eq!(r, 18);

    let (r, _) = run("int main() { int a[2]; int *e; e = &a[1]; *e = 6; return a[1]; }");
    assert_eq!(r, 6);
}

#[test]
fn logical_operators_skip_side_effects() {
    let (r, _) = run(
        "int c = 0;
        int bump() { c = c + 1; return 1; }
        int main() { int r; r = 0 && bump(); r = 1 || bump(); r = 1 && bump(); return c; }",
    );
    assert_eq!(r, 1);
}

#[test]
fn scanf_reads_into_addresses() {
    let (r, out) = run_with_input(
        "int main() { int a, b; scanf(\"%d %d\", &a, &b); printf(\"%d\", a * b); return a; }",
        &[6, 7],
    );
    assert_eq!((r, out.as_str()), (6, "42"));
}

#[test]
fn void_function_value() {
    let (line, err) =
        translation_error("void g() { }\nint main() {\n int a;\n a = g();\n return 0;\n}");
    assert_eq!(line, 4);
    assert_eq!(err, TranslationError::TypeMismatch(Mismatch::VoidValue("g".into())));

    let (r, _) = run("void g() { return; } int main() { g(); return 2; }");
    assert_eq!(r, 2);
}

#[test]
fn names_used_as_the_wrong_kind() {
    assert_eq!(
        translation_error("int f() { return 1; } int main() { return f + 1; }").1,
        TranslationError::TypeMismatch(Mismatch::NotAVariable("f".into()))
    );
    assert_eq!(
        translation_error("int v; int main() { return v(); }").1,
        TranslationError::TypeMismatch(Mismatch::NotAFunction("v".into()))
    );
    assert_eq!(
        translation_error("int main() { return h(); }").1,
        TranslationError::UndeclaredSymbol("h".into())
    );
    assert_eq!(
        translation_error("int main() { return z; }").1,
        TranslationError::UndeclaredSymbol("z".into())
    );
}

#[test]
fn prototypes_pair_with_one_definition() {
    assert_eq!(
        translation_error("int f(int a); int f(int a); int main() { return 0; }").1,
        TranslationError::Redeclaration("f".into())
    );
    assert_eq!(
        translation_error("int f(int a); int f(int *a) { return 0; } int main() { return 0; }").1,
        TranslationError::TypeMismatch(Mismatch::Signature("f".into()))
    );
    assert_eq!(
        translation_error("int f() { return 0; } int f() { return 1; } int main() { return 0; }").1,
        TranslationError::Redeclaration("f".into())
    );
}

#[test]
fn missing_main() {
    assert_eq!(
        translation_error("int f() { return 0; }").1,
        TranslationError::UndeclaredSymbol("main".into())
    );
    assert_eq!(
        translation_error("int main();").1,
        TranslationError::UndeclaredSymbol("main".into())
    );
}

#[test]
fn printf_arity() {
    let (line, err) = translation_error("int main() {\n printf(\"%d %d\", 1);\n return 0;\n}");
    assert_eq!(line, 2);
    assert_eq!(
        err,
        TranslationError::Arity {
            routine: "printf".into(),
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn reserved_names() {
    for name in vec!["calloc", "__globals_init", "__globals_ready", "__str_0"] {
        let text = format!("int {}; int main() {{ return 0; }}", name);
        assert_eq!(
            translation_error(&text).1,
            TranslationError::Redeclaration(name.into())
        );
    }
}

#[test]
fn errors_name_their_stage() {
    match compile("int main() { return 0; } $") {
        Err(e @ CompileError::Lexer(_)) => assert!(e.to_string().starts_with("Lexer error @ L1")),
        r => panic!("Expected a lexer error, got {:?}", r.map(|_| ())),
    }
    match compile("int main() { return 0 }") {
        Err(e @ CompileError::Parser(_)) => assert!(e.to_string().starts_with("Parser error @ L1")),
        r => panic!("Expected a parser error, got {:?}", r.map(|_| ())),
    }
}
