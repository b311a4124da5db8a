//! Example demonstrating ToolArgs and ToolResult usage

use sdk::{ToolArgs, ToolResult};
use serde_json::json;

fn main() {
    // Example 1: Parsing arguments the way a model produces them
    let args = ToolArgs::from_json_str(r#"{"operation": "divide", "a": 10, "b": 4}"#);
    println!("Parsed {} arguments", args.len());

    // Example 2: Typed accessors
    if let Some(operation) = args.str_arg("operation") {
        println!("Operation: {}", operation);
    }
    println!("a = {:?}", args.f64_arg("a"));
    println!("b = {:?}", args.f64_arg("b"));

    // Example 3: Missing and mistyped values are None, not errors
    println!("missing = {:?}", args.str_arg("precision"));
    println!("mistyped = {:?}", args.bool_arg("a"));

    // Example 4: Malformed input collapses to the empty set
    let bad = ToolArgs::from_json_str("{not json at all");
    println!("Malformed input yields {} arguments", bad.len());

    // Example 5: Building arguments by hand (tests do this a lot)
    let built = ToolArgs::new()
        .with("operation", json!("add"))
        .with("a", json!(2))
        .with("b", json!(3));
    println!("Built: {}", built.to_value());

    // Example 6: Successful results
    let ok = ToolResult::success(json!({ "result": 2.5 }));
    println!("Success: {}", serde_json::to_string(&ok).unwrap());

    // Example 7: Contained failures carry their reason as data
    let failed = ToolResult::failure("Cannot divide by zero");
    println!("Failure: {}", serde_json::to_string(&failed).unwrap());
}
