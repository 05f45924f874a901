use super::*;
use pretty_assertions::assert_eq;

fn parse(source: &str) -> SourceFile {
    parse_file("test.go", source).unwrap()
}

fn struct_of<'f>(file: &'f SourceFile, name: &str) -> &'f StructType {
    file.types()
        .iter()
        .find(|decl| decl.name() == name)
        .and_then(TypeDecl::as_struct)
        .unwrap()
}

#[test]
fn parse_type_expressions() {
    assert_eq!(parse_type("int").unwrap(), TypeExpr::ident("int"));
    assert_eq!(
        parse_type("[]*mp.Jump").unwrap(),
        TypeExpr::slice(TypeExpr::pointer(TypeExpr::selector("mp", "Jump")))
    );
    assert_eq!(
        parse_type("[4]byte").unwrap(),
        TypeExpr::Array {
            len: Some("4".into()),
            elem: Box::new(TypeExpr::ident("byte")),
        }
    );
    assert_eq!(
        parse_type("map[string][]int").unwrap(),
        TypeExpr::Map {
            key: Box::new(TypeExpr::ident("string")),
            value: Box::new(TypeExpr::slice(TypeExpr::ident("int"))),
        }
    );
    assert_eq!(parse_type("interface{}").unwrap(), TypeExpr::Interface);
    assert_eq!(
        parse_type("interface { String() string }").unwrap(),
        TypeExpr::Interface
    );
    assert_eq!(parse_type("func(a, b int) (int, error)").unwrap(), TypeExpr::Func);
    assert_eq!(parse_type("func() error").unwrap(), TypeExpr::Func);
    assert_eq!(
        parse_type("<-chan int").unwrap(),
        TypeExpr::Chan(Box::new(TypeExpr::ident("int")))
    );
    assert_eq!(
        parse_type("chan<- *T").unwrap(),
        TypeExpr::Chan(Box::new(TypeExpr::pointer(TypeExpr::ident("T"))))
    );
    assert_eq!(
        parse_type("list.List[int]").unwrap(),
        TypeExpr::Generic(Box::new(TypeExpr::selector("list", "List")))
    );
    assert_eq!(parse_type("(*T)").unwrap(), TypeExpr::pointer(TypeExpr::ident("T")));
}

#[test]
fn parse_invalid_type_expressions() {
    assert!(parse_type("").is_err());
    assert!(parse_type("[]").is_err());
    assert!(parse_type("map[string").is_err());
    assert!(parse_type("int int").is_err());
}

#[test]
fn parse_demo_file() {
    let file = parse(
        r#"package pkg2

import mp "github.com/jdxj/study-ast/demo/pkg1"

type People struct {
	// Jump mp.Jump `json:"jump"` // 跳
	Jumps []*mp.Jump `json:"jumps"` // 跳跳
	*mp.Sing
	Animal mp.Animal `json:"animal"` // 动物
	Age    int       `json:"age"`    // 年龄
	// Rap Rap `json:"rap"` // 低
	Raps []*Rap `json:"raps"` // 低低
}

type Rap struct {
	Low int `json:"low"` // 低音
}
"#,
    );

    assert_eq!(file.name(), "test.go");
    assert_eq!(file.package(), "pkg2");
    assert_eq!(
        file.imports(),
        [Import::new(
            Some("mp".into()),
            "github.com/jdxj/study-ast/demo/pkg1"
        )]
    );
    assert_eq!(file.types().len(), 2);

    let people = struct_of(&file, "People");
    let expected = vec![
        FieldDecl::named(
            "Jumps",
            TypeExpr::slice(TypeExpr::pointer(TypeExpr::selector("mp", "Jump"))),
        )
        .with_tag(r#"json:"jumps""#)
        .with_comment(" 跳跳"),
        FieldDecl::embedded(TypeExpr::pointer(TypeExpr::selector("mp", "Sing"))),
        FieldDecl::named("Animal", TypeExpr::selector("mp", "Animal"))
            .with_tag(r#"json:"animal""#)
            .with_comment(" 动物"),
        FieldDecl::named("Age", TypeExpr::ident("int"))
            .with_tag(r#"json:"age""#)
            .with_comment(" 年龄"),
        FieldDecl::named(
            "Raps",
            TypeExpr::slice(TypeExpr::pointer(TypeExpr::ident("Rap"))),
        )
        .with_tag(r#"json:"raps""#)
        .with_comment(" 低低"),
    ];
    assert_eq!(people.fields(), expected.as_slice());
    assert_eq!(people.fields()[2].description(), "动物");
}

#[test]
fn parse_nested_inline_structs() {
    let file = parse(
        r#"package pkg3

type Object struct {
	Id    int `json:"id"` // 唯一
	Array []struct {
		Hello struct {
			World string `json:"world"` // ww
		} `json:"hello"` // hh
	} `json:"array"` // aa
}
"#,
    );

    let object = struct_of(&file, "Object");
    assert_eq!(object.fields().len(), 2);

    let array = &object.fields()[1];
    assert_eq!(array.names(), ["Array"]);
    assert_eq!(array.external_name("json"), "array");
    assert_eq!(array.description(), "aa");
    let TypeExpr::Array { len: None, elem } = array.ty() else {
        panic!("Expected slice type");
    };
    let TypeExpr::Struct(inner) = &**elem else {
        panic!("Expected inline struct");
    };

    let hello = &inner.fields()[0];
    assert_eq!(hello.external_name("json"), "hello");
    assert_eq!(hello.description(), "hh");
    let TypeExpr::Struct(world) = hello.ty() else {
        panic!("Expected inline struct");
    };
    assert_eq!(world.fields()[0].names(), ["World"]);
    assert_eq!(world.fields()[0].description(), "ww");
}

#[test]
fn parse_grouped_declarations() {
    let file = parse(
        r#"// Package doc.
package models

import (
	"fmt"
	_ "embed"
	. "strings"
	yaml "gopkg.in/yaml.v3"
	`example.com/m/raw`
)

type (
	ID = int64

	Pair[K comparable, V any] struct {
		Key   K
		Value V
	}

	Matrix [4][4]float64

	User struct{ Name string; Age int }
)
"#,
    );

    let imports: Vec<_> = file
        .imports()
        .iter()
        .map(|i| (i.alias(), i.path()))
        .collect();
    assert_eq!(
        imports,
        [
            (None, "fmt"),
            (Some("_"), "embed"),
            (Some("."), "strings"),
            (Some("yaml"), "gopkg.in/yaml.v3"),
            (None, "example.com/m/raw"),
        ]
    );

    let names: Vec<_> = file.types().iter().map(TypeDecl::name).collect();
    assert_eq!(names, ["ID", "Pair", "Matrix", "User"]);
    assert_eq!(file.types()[0].ty(), &TypeExpr::ident("int64"));
    assert_eq!(struct_of(&file, "Pair").fields().len(), 2);
    assert!(matches!(
        file.types()[2].ty(),
        TypeExpr::Array { len: Some(len), .. } if len == "4"
    ));

    let user = struct_of(&file, "User");
    let user_fields: Vec<_> = user.fields().iter().map(|f| f.names()[0].as_str()).collect();
    assert_eq!(user_fields, ["Name", "Age"]);
}

#[test]
fn skip_other_declarations() {
    let file = parse(
        r#"package main

import "fmt"

const (
	a = iota
	b
)

var table = map[string]struct{ X int }{
	"}": {X: '}'},
	"raw": {X: len(`{`)},
}

func main() {
	type Local struct{ Hidden int }
	s := "type Fake struct {"
	/* } */
	fmt.Println(s, '\'', table)
}

func (p *Point) String() string { return "" }

type Point struct {
	X, Y int `json:"x"` /* shared */
}
"#,
    );

    let names: Vec<_> = file.types().iter().map(TypeDecl::name).collect();
    assert_eq!(names, ["Point"]);

    let point = struct_of(&file, "Point");
    assert_eq!(point.fields().len(), 1);
    assert_eq!(point.fields()[0].names(), ["X", "Y"]);
    assert_eq!(point.fields()[0].description(), "shared");
}

#[test]
fn parse_field_forms() {
    let file = parse(
        "package p\n\
         \n\
         type T struct {\n\
         \tBase\n\
         \tList[int]\n\
         \tsync.Mutex `json:\"-\"`\n\
         \tA, \n\
         \tB string\n\
         \tFn func(int) error `json:\"fn\"`\n\
         \tCh <-chan int\n\
         \tM map[string]any // dict\n\
         \tQuoted int \"json:\\\"quoted,omitempty\\\"\"\n\
         \tArr [2]Base\n\
         }\n",
    );

    let t = struct_of(&file, "T");
    let fields = t.fields();
    assert_eq!(fields.len(), 9);
    assert_eq!(fields[0], FieldDecl::embedded(TypeExpr::ident("Base")));
    assert_eq!(
        fields[1],
        FieldDecl::embedded(TypeExpr::Generic(Box::new(TypeExpr::ident("List"))))
    );
    assert!(fields[2].is_embedded());
    assert_eq!(fields[2].ty(), &TypeExpr::selector("sync", "Mutex"));
    assert_eq!(fields[3].names(), ["A", "B"]);
    assert_eq!(fields[4].ty(), &TypeExpr::Func);
    assert_eq!(fields[4].external_name("json"), "fn");
    assert!(matches!(fields[5].ty(), TypeExpr::Chan(_)));
    assert_eq!(fields[6].description(), "dict");
    assert_eq!(fields[7].tag(), Some(r#"json:"quoted,omitempty""#));
    assert_eq!(fields[7].external_name("json"), "quoted");
    assert_eq!(fields[8].names(), ["Arr"]);
}

#[test]
fn syntax_errors() {
    let err = parse_file("bad.go", "package p\n\ntype T struct {\n\tA int\n").unwrap_err();
    assert_eq!(err.line(), 5);
    assert_eq!(err.message(), "unexpected end of input");

    let err = parse_file("bad.go", "package p\n\ntype T struct {\n\tA int B\n}\n").unwrap_err();
    assert_eq!(err.line(), 4);
    assert_eq!(err.message(), "unexpected `B`");

    let err = parse_file("bad.go", "package p\n}\n").unwrap_err();
    assert_eq!(err.line(), 2);

    let err = parse_file("bad.go", "type T struct{}\n").unwrap_err();
    assert_eq!(err.line(), 1);

    assert!(parse_file("bad.go", "package p\nvar s = \"open\n").is_err());

    // Errors inside grouped declarations point at the offending token.
    let source = "package p\n\ntype (\n\tA struct {\n\t\tX int Y\n\t}\n)\n";
    let err = parse_file("bad.go", source).unwrap_err();
    assert_eq!(err.line(), 5);
    assert_eq!(err.message(), "unexpected `Y`");

    let err = parse_file("bad.go", "package p\n\nimport (\n\t\"fmt\"\n\t42\n)\n").unwrap_err();
    assert_eq!(err.line(), 5);
    assert_eq!(err.message(), "unexpected `42`");
}

#[test]
fn byte_order_mark_is_ignored() {
    let file = parse_file("bom.go", "\u{feff}package p\n\ntype T struct{ X int }\n").unwrap();
    assert_eq!(file.package(), "p");
    assert_eq!(file.types()[0].name(), "T");

    let err = parse_file("bom.go", "\u{feff}package p\n\ntype T struct{\n").unwrap_err();
    assert_eq!(err.line(), 4);
}
