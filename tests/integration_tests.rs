//! Integration tests - write fixture files, convert them and inspect the output

use bomtex::{
    convert_bom_file, load_descriptions, load_format_rules, resolve_bom_file, tex_output_path, write_dump,
    GroupMode, RenderOptions, ResolvedBom,
};
use std::fs;
use std::path::{Path, PathBuf};

const FORMAT: &str = "\
# naming rules
refdes:field1
quantity:field4
R:field2 Ohm field3
C:field2 field3
*:field2
";

const DESCRIPTION: &str = "\
R:Resistor,Resistors
C:Capacitor,Capacitors
C:Ignored duplicate
U:Chip
";

const BOM: &str = "\
Designator,Value,Tolerance,Quantity
\"R1,R2\",10,+/-5%,2
R3,10,+/-5%,1
R4,22,,1
\"C2, C1\",100n,X7R,2
U1,\"\"\"Timer\"\" IC\",,1
";

struct Fixture {
    _dir: tempfile::TempDir,
    format: PathBuf,
    description: PathBuf,
    bom: PathBuf,
}

fn fixture(format: &str, description: &str, bom: &str) -> Fixture {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let write = |name: &str, content: &str| {
        let path = dir.path().join(name);
        fs::write(&path, content).expect("Failed to write fixture");
        path
    };
    let format = write("format", format);
    let description = write("description", description);
    let bom = write("board.csv", bom);
    Fixture { _dir: dir, format, description, bom }
}

fn convert(fx: &Fixture, options: &RenderOptions) -> (ResolvedBom, String) {
    let rules = load_format_rules(&fx.format).unwrap();
    let descriptions = load_descriptions(&fx.description).unwrap();
    let output = tex_output_path(&fx.bom);
    let bom = convert_bom_file(&fx.bom, &output, &rules, &descriptions, options).unwrap();
    (bom, fs::read_to_string(&output).unwrap())
}

fn body(text: &str) -> Vec<&str> {
    text.lines()
        .skip_while(|l| *l != r"\begin{ElementList}")
        .skip(1)
        .take_while(|l| *l != r"\end{ElementList}")
        .collect()
}

#[test]
fn test_convert_grouped() {
    let fx = fixture(FORMAT, DESCRIPTION, BOM);
    let (bom, text) = convert(&fx, &RenderOptions::new());

    assert_eq!(bom.components.len(), 7);
    assert!(bom.missing.is_empty());
    assert_eq!(tex_output_path(&fx.bom), fx.bom.with_extension("tex"));

    assert!(text.starts_with("\\documentclass[doctype=pe]{pcbdoc}\n"));
    assert!(text.ends_with("\\end{ElementList}\n\\end{document}\n"));
    assert_eq!(body(&text), vec![
        r"\Part{Capacitors}",
        r"\Element{100n X7R}{\refbox{C1, C2}}{2}",
        r"\Part{Resistors}",
        r"\Element{10 Ohm $\pm$5\%}{\refbox{R1…R3}}{3}",
        r"\Element{22 Ohm}{\refbox{R4}}{1}",
        r"\Part{Chip}",
        r"\Element{<<Timer>> IC}{\refbox{U1}}{1}",
    ]);
}

#[test]
fn test_convert_ungrouped_with_spacers() {
    let fx = fixture(FORMAT, DESCRIPTION, BOM);
    let options = RenderOptions::new().with_group(GroupMode::None).with_strings(2);
    let (_, text) = convert(&fx, &options);

    assert_eq!(body(&text), vec![
        r"\Part{Capacitors}",
        r"\Element{100n X7R}{\refbox{C1}}{1}",
        r"\Element{100n X7R}{\refbox{C2}}{1}",
        r"\Element{}{}{}",
        r"\Part{Resistors}",
        r"\Element{10 Ohm $\pm$5\%}{\refbox{R1}}{1}",
        r"\Element{10 Ohm $\pm$5\%}{\refbox{R2}}{1}",
        r"\Element{}{}{}",
        r"\Element{10 Ohm $\pm$5\%}{\refbox{R3}}{1}",
        r"\Element{22 Ohm}{\refbox{R4}}{1}",
        r"\Element{}{}{}",
        r"\Part{Chip}",
        r"\Element{<<Timer>> IC}{\refbox{U1}}{1}",
    ]);
}

#[test]
fn test_scenario_shared_value_forms_one_group() {
    let fx = fixture(
        "refdes:field1\nquantity:field3\nR:field2 Ohm\n",
        "R:Resistor,Resistors\n",
        "RefDes,Value,Qty\n\"R1,R2\",10,1\n",
    );
    let (_, text) = convert(&fx, &RenderOptions::new());
    assert_eq!(body(&text), vec![r"\Part{Resistors}", r"\Element{10 Ohm}{\refbox{R1, R2}}{2}"]);
}

#[test]
fn test_missing_rule_skips_type() {
    let fx = fixture(
        "refdes:field1\nR:field2\n",
        "R:Resistor,Resistors\nX:Crystal\n",
        "Ref,Value\nR1,1k\nX1,16MHz\nX2,32kHz\n",
    );
    let (bom, text) = convert(&fx, &RenderOptions::new());

    assert_eq!(bom.missing, vec!["X".to_string()]);
    assert!(!text.contains("X1"));
    assert!(!text.contains("Crystal"));
    assert_eq!(body(&text), vec![r"\Part{Resistor}", r"\Element{1k}{\refbox{R1}}{1}"]);
}

#[test]
fn test_refdes_by_column_name() {
    let fx = fixture(
        "RefDes:Designator\nQuantity:Qty\n*:field1\n",
        "C:Capacitor\n",
        "Value,Designator,Qty\n1u,C1,1\n",
    );
    let (_, text) = convert(&fx, &RenderOptions::new());
    assert_eq!(body(&text), vec![r"\Part{Capacitor}", r"\Element{1u}{\refbox{C1}}{1}"]);
}

#[test]
fn test_dump_is_sorted_json() {
    let fx = fixture(FORMAT, DESCRIPTION, BOM);
    let rules = load_format_rules(&fx.format).unwrap();
    let bom = resolve_bom_file(&fx.bom, &rules).unwrap();

    let dump_path = fx.bom.with_extension("json");
    write_dump(&bom, &dump_path).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&dump_path).unwrap()).unwrap();
    let components = value["components"].as_object().unwrap();
    assert_eq!(components["R1"]["name"], serde_json::json!(["10", " Ohm ", "+/-5%"]));
    assert_eq!(components["R1"]["quantity"], "1");
    assert!(value.get("missing").is_none());
}

#[test]
fn test_missing_bom_file_is_error() {
    let fx = fixture(FORMAT, DESCRIPTION, BOM);
    let rules = load_format_rules(&fx.format).unwrap();
    let absent = Path::new(&fx.bom).with_file_name("absent.csv");
    assert!(resolve_bom_file(&absent, &rules).is_err());
}
