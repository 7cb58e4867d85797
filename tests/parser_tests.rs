// Integration tests for the lambda-language parser

use lamparse::parser::{
    parse_program, ErrorKind, Limits, ListKind, Node, Parser, SyntaxError,
};
use pretty_assertions::assert_eq;

fn read(source: &[u8]) -> Node {
    match Parser::new(source).read_form() {
        Ok(Some(node)) => node,
        other => panic!("failed to parse {:?}: {:?}", source, other),
    }
}

fn read_err(source: &[u8]) -> SyntaxError<'_> {
    match Parser::new(source).read_form() {
        Err(err) => err,
        Ok(node) => panic!("expected an error for {:?}, got {:?}", source, node),
    }
}

fn application_arity(node: &Node) -> (String, usize) {
    let app = node.expect_list();
    assert_eq!(app.kind(), ListKind::Application);
    let args = app.tail()[0].expect_list();
    assert_eq!(args.kind(), ListKind::Parameters);
    (app.head().label(), args.len())
}

#[test]
fn test_identifiers_and_integers() {
    assert_eq!(read(b"  a  ").as_identifier(), Some("a"));
    assert_eq!(read(b"    \n\n\t\t  \nX ").as_identifier(), Some("X"));
    assert_eq!(read(b"~").as_identifier(), Some("~"));
    let odd = "az!$&%*/:<>λ?@^_~AZ";
    assert_eq!(read(odd.as_bytes()).as_identifier(), Some(odd));
    assert_eq!(read(b"`4").as_identifier(), Some("`4"));

    assert_eq!(read(b" \n  0 \t ").as_integer(), Some(0));
    assert_eq!(read(b"9876543210").as_integer(), Some(9876543210));
    assert_eq!(read(b" -1  ").as_integer(), Some(-1));
    assert_eq!(read(b" +1  ").as_integer(), Some(1));
    assert_eq!(read(b"101(abc").as_integer(), Some(101));
    assert_eq!(read(b"202)abc").as_integer(), Some(202));
}

#[test]
fn test_integer_range() {
    assert_eq!(read(b"9223372036854775807").as_integer(), Some(i64::MAX));
    assert_eq!(read(b"-9223372036854775808").as_integer(), Some(i64::MIN));
    for source in [
        "9223372036854775808",
        "-9223372036854775809",
        "99223372036854775807",
        "-99223372036854775808",
    ] {
        assert_eq!(read_err(source.as_bytes()).kind, ErrorKind::IntegerRange);
    }
    assert_eq!(read_err(b"1k").kind, ErrorKind::IntegerSyntax);
    assert_eq!(read_err(b"01.").kind, ErrorKind::IntegerSyntax);
    assert_eq!(read_err(b"+a").kind, ErrorKind::IntegerSyntax);
    let too_long = "1".repeat(30);
    assert_eq!(read_err(too_long.as_bytes()).kind, ErrorKind::IntegerLength);
}

#[test]
fn test_strings() {
    assert_eq!(read(b"\"\"").as_str(), Some(""));
    assert_eq!(read(b"\n\n\n\"a\"").as_str(), Some("a"));
    assert_eq!(
        read(b"// Comment\n\"az!$&%*/:<=>?@^_~AZ\"").as_str(),
        Some("az!$&%*/:<=>?@^_~AZ")
    );
    assert_eq!(read(b"\"\\\\\"").as_str(), Some("\\"));
    assert_eq!(read(b"\"\\r\\n\\t\"").as_str(), Some("\r\n\t"));
    assert_eq!(read(b"\"\n\"").as_str(), Some("\n"));
    assert_eq!(read("\"λ→\"".as_bytes()).as_str(), Some("λ→"));

    assert_eq!(read_err(b"\"").kind, ErrorKind::UnexpectedEof);
    assert_eq!(read_err(b"\"abc").kind, ErrorKind::UnexpectedEof);
    assert_eq!(read_err(b"\"\\\"").kind, ErrorKind::UnexpectedEof);

    let err = read_err(b"\"\\x\"");
    assert_eq!((err.kind, err.offset()), (ErrorKind::StringEscape, 1));
    let err = read_err(b"\"\\n\\a\\t\"");
    assert_eq!((err.kind, err.offset()), (ErrorKind::StringEscape, 3));
}

#[test]
fn test_length_limits() {
    let limits = Limits::default();
    let longest = "A".repeat(limits.max_identifier_len);
    assert_eq!(read(longest.as_bytes()).as_identifier(), Some(&longest[..]));
    let too_long = "A".repeat(limits.max_identifier_len + 1);
    let err = read_err(too_long.as_bytes());
    assert_eq!(err.kind, ErrorKind::IdentifierLength);
    assert_eq!(err.offset(), limits.max_identifier_len);

    let content = "x".repeat(limits.max_string_len);
    let string = format!("\"{}\"", content);
    assert_eq!(read(string.as_bytes()).as_str(), Some(&content[..]));
    let string = format!("\"{}x\"", content);
    assert_eq!(read_err(string.as_bytes()).kind, ErrorKind::StringLength);

    let strict = Limits::default().with_identifier_len(3);
    let mut parser = Parser::with_limits(b"abcd", strict);
    assert_eq!(
        parser.read_form().unwrap_err().kind,
        ErrorKind::IdentifierLength
    );
}

#[test]
fn test_comments() {
    for source in ["//", "//       ", "//    Hello, world!   ", "//\n       "] {
        assert!(Parser::new(source.as_bytes()).read_form().unwrap().is_none());
    }
    let node = read(b"// Hello, world!\nNext line not part of comment.");
    assert_eq!(node.as_identifier(), Some("Next"));
    assert_eq!(node.location().offset, 17);
}

#[test]
fn test_bad_characters() {
    let err = read_err(b"\x7F");
    assert_eq!((err.kind, err.offset()), (ErrorKind::BadChar, 0));
    let err = read_err(b"+");
    assert_eq!((err.kind, err.offset()), (ErrorKind::IntegerSyntax, 0));
    assert_eq!(read_err(b"foo\x07b").kind, ErrorKind::IdentifierSyntax);

    let err = read_err(b"km!<gg\xF6h");
    assert_eq!((err.kind, err.offset()), (ErrorKind::IdentifierSyntax, 7));
    let err = read_err(b"km!<gg\x07h");
    assert_eq!((err.kind, err.offset()), (ErrorKind::IdentifierSyntax, 6));

    let err = read_err(b"az!$&%*/:<>\xCE\xBB?@^_~A\xC0\0AZ");
    assert_eq!(err.kind, ErrorKind::IdentifierSyntax);
}

#[test]
fn test_parameter_list_errors() {
    assert!(read(b"(1, 2, 3, `4)").is_parameters());

    let cases: [(&[u8], ErrorKind, usize); 7] = [
        (b"(1 (2 (3 ` 4)))", ErrorKind::Parameters, 3),
        (b"(1, (2, (3, ` 4)))", ErrorKind::Parameters, 14),
        (b"(\t\t\t\n", ErrorKind::UnexpectedEof, 5),
        (b"(1", ErrorKind::UnexpectedEof, 2),
        (b"(((((1", ErrorKind::UnexpectedEof, 6),
        (b"(1, 2 , 3 ", ErrorKind::UnexpectedEof, 10),
        (b"(1, 2, (3))", ErrorKind::Parameters, 7),
    ];
    for (source, kind, offset) in cases {
        let err = read_err(source);
        assert_eq!((err.kind, err.offset()), (kind, offset), "{:?}", source);
    }

    let node = read(b"(1, 2, a())");
    assert!(node.is_parameters() && node.is_pair() && node.is_proper_list());
}

#[test]
fn test_extra_close() {
    let err = read_err(b")");
    assert_eq!((err.kind, err.offset()), (ErrorKind::BadChar, 0));

    let mut parser = Parser::new(b"(foo, bar))");
    assert!(parser.read_form().unwrap().unwrap().is_parameters());
    let err = parser.read_form().unwrap_err();
    assert_eq!(err.offset(), 10);
}

#[test]
fn test_applications() {
    let cases: [(&[u8], &str, usize); 7] = [
        (b"f()", "f", 0),
        (b"f(// This is a comment!\n)", "f", 0),
        (b"   f\n (\n\n)", "f", 0),
        (b"f(1 ) ", "f", 1),
        (b"f(1, x, y) ", "f", 3),
        (b"f(1, g(x), zebra) ", "f", 3),
        (b"  <o>(foo(1), bar(1, 2), baz(1, 2, 3), qux()   )", "<o>", 4),
    ];
    for (source, name, arity) in cases {
        assert_eq!(application_arity(&read(source)), (name.to_string(), arity));
    }

    read_err(b"  <o>(foo(1), bar(1, 2), baz(1, 2, 3), qux() ");
    read_err(b"  <o>(foo(1), bar(1, 2), baz(1, 2, 3) qux()) ");

    let node = read(b"{a}(1)");
    assert!(node.expect_list().head().is_block());

    let node = read(b"f(x)()");
    assert_eq!(node.expect_list().tail()[0].expect_list().len(), 0);
    assert!(node.expect_list().head().is_application());

    let node = read(b"{f}({g; h}, j, {k}(1, 2))");
    let args = node.expect_list().tail()[0].expect_list();
    assert!(args.head().is_block());
    assert!(args.items()[2].is_application());
}

#[test]
fn test_curried_application() {
    let node = read(b"f(a)(b, c)(d, e, f)");
    let outer = node.expect_list();
    assert_eq!(outer.tail()[0].expect_list().len(), 3);
    let middle = outer.head().expect_list();
    assert_eq!(middle.kind(), ListKind::Application);
    assert_eq!(middle.tail()[0].expect_list().len(), 2);
    let inner = middle.head().expect_list();
    assert_eq!(inner.kind(), ListKind::Application);
    assert_eq!(inner.head().as_identifier(), Some("f"));
    assert_eq!(inner.tail()[0].expect_list().len(), 1);
}

#[test]
fn test_blocks() {
    let cases: [(&[u8], usize); 6] = [
        (b"{}", 0),
        (b"//Hi\n   {   \n   \n//More\n }", 0),
        (b" {  1  } ", 1),
        (b" {  1; 2; 3 } ", 3),
        (b" {  w; x; y; z } ", 4),
        (b" {  w; f(x, y); z } ", 3),
    ];
    for (source, len) in cases {
        let node = read(source);
        assert!(node.is_block());
        assert_eq!(node.expect_list().len(), len);
    }

    let failures: [&[u8]; 8] = [
        b"{",
        b"}",
        b"//Hi\n   {   \n   \n//More\n ",
        b" {  1   2    3 } ",
        b" {  1,  2,    3 } ",
        b" {  1,  2;    3 } ",
        b" {  1   2;    3; } ",
        b" {  1;  2;    3; } ",
    ];
    for source in failures {
        read_err(source);
    }
    assert_eq!(read_err(b"{1 2 3}").kind, ErrorKind::Block);
}

#[test]
fn test_lambdas() {
    for source in [
        "lambda(){}",
        "lambda(a){}",
        "lambda(a, b, c, d, e, f){}",
        "lambda(a, b, c, d, e, f){a; b; c; d; e; f; g; h}",
        "λ(x) {x}",
    ] {
        assert!(read(source.as_bytes()).is_lambda(), "{}", source);
    }
    for source in [
        "lambda(1){}",
        "lambda({}){}",
        "lambda(x, (y)){}",
        "lambda(x, y, 1, z){}",
    ] {
        read_err(source.as_bytes());
    }
}

#[test]
fn test_factorial_program() {
    let source = b"def fact = \xCE\xBB(n) {cond (zero?(n) => 1) \
                   (true => mul(n, fact(sub(n, 1))))}";
    let program = parse_program(source).unwrap().unwrap();
    let def = program.expect_list();
    assert_eq!(def.kind(), ListKind::Definition);
    assert_eq!(def.head().as_identifier(), Some("fact"));

    let lambda = def.tail()[0].expect_list();
    assert_eq!(lambda.kind(), ListKind::Lambda);
    let formals = lambda.head().expect_list();
    assert_eq!(formals.head().as_identifier(), Some("n"));

    let body = lambda.tail()[0].expect_list();
    assert_eq!(body.kind(), ListKind::Block);
    let cond = body.head().expect_list();
    assert_eq!(cond.kind(), ListKind::Cond);
    assert_eq!(cond.len(), 2);
    for clause in cond {
        assert!(clause.is_clause());
        assert_eq!(clause.expect_list().len(), 2);
    }
}

#[test]
fn test_program_level() {
    let err = parse_program(b"(a, b)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Program);
    assert!(parse_program(b"   ").unwrap().is_none());

    // Trailing input is visible to a second read
    let mut parser = Parser::new(b"f(1) )");
    assert!(parser.read_program().unwrap().is_some());
    assert_eq!(parser.read_program().unwrap_err().kind, ErrorKind::BadChar);
}

#[test]
fn test_error_report() {
    let source = b"def x = 1\n{a; b c}\n";
    let err = parse_program(source).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Block);
    assert_eq!(err.offset(), 16);
    assert_eq!(err.line_column(), (2, 7));
    assert_eq!(
        err.report(),
        "Syntax error [Improper block]: expected separator here\n  {a; b c}\n        ^\n"
    );
}

#[test]
fn test_tree_display() {
    let program = parse_program(b"{let a = 5; add(a, \"s\\n\")}").unwrap().unwrap();
    let expected = "\
Block
└── Let
    ├── a
    ├── 5
    └── Block
        └── Application
            ├── add
            └── Parameters
                ├── a
                └── \"s\\n\"
";
    assert_eq!(program.tree().to_string(), expected);
}

#[test]
fn test_deep_nesting_is_an_error() {
    let parens = "(".repeat(10 * 1024);
    let err = parse_program(parens.as_bytes()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Nesting);
    assert_eq!(err.offset(), 256);

    let braces = format!("{}{}", "{".repeat(1100), "}".repeat(1100));
    let err = parse_program(braces.as_bytes()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Nesting);
    assert_eq!(err.offset(), 256);

    let lets = format!("{}1", "let a = ".repeat(400));
    let err = parse_program(lets.as_bytes()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Nesting);
    assert_eq!(err.offset(), 256 * 8);

    let lambdas = "λ() {".repeat(400);
    let err = parse_program(lambdas.as_bytes()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Nesting);
}

#[test]
fn test_nesting_within_limit() {
    let source = format!("{}{}", "{".repeat(200), "}".repeat(200));
    let mut tree = &read(source.as_bytes());
    let mut depth = 1;
    while let Some(inner) = tree.as_list().and_then(|list| list.get(0)) {
        tree = inner;
        depth += 1;
    }
    assert_eq!(depth, 200);
    assert!(tree.is_nil());
}

#[test]
fn test_configured_depth() {
    let limits = Limits::default().with_depth(4);
    let mut parser = Parser::with_limits(b"{{{{}}}}", limits);
    assert!(parser.read_program().unwrap().unwrap().is_block());

    let source = b"{{{{{}}}}}";
    let err = Parser::with_limits(source, limits).read_form().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Nesting);
    assert_eq!(err.offset(), 4);
    assert_eq!(
        err.report(),
        "Syntax error [Forms nested too deeply]: forms nested too deeply\n  {{{{{}}}}}\n      ^\n"
    );

    // The depth unwinds after each form, so siblings are not penalised
    let source = b"{{{{}}}; {{{}}}}";
    assert!(Parser::with_limits(source, limits).read_form().is_ok());
}
