//! Inspection CLI for stack items and scripts.
//!
//! # Usage
//! ```text
//! neo-inspect <command> <input>
//! ```
//!
//! # Commands
//! - `stack-item <json|@file>`: decode a stack item and print every accessor's result
//! - `push <hex>`: walk a script made of push instructions and print each literal
//! - `var-int <n>`: print the VarInt encoding of `n`
//!
//! Logging follows `NEO_CODEC_LOG` and `NEO_CODEC_LOG_TIMESTAMP`.
//!
//! # Examples
//! ```text
//! neo-inspect stack-item '{"type":"Integer","value":"1124"}'
//! neo-inspect stack-item @response.json
//! neo-inspect push 0c01611011
//! neo-inspect var-int 65536
//! ```

use neo_codec::stack_item::StackItem;
use neo_codec::types::binary_reader::BinaryReader;
use neo_codec::types::errors::CodecError;
use neo_codec::types::var_int;
use neo_codec::utils::log::LogConfig;
use neo_codec::virtual_machine::op_code::{OpCode, Operand};
use neo_codec::{debug, error};
use std::env;
use std::fmt::Display;
use std::fs;
use std::process;

fn main() {
    LogConfig::from_env().apply();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }
    if args.len() != 3 {
        error!("{} expects exactly one input\n", args[1]);
        print_usage(&args[0]);
        process::exit(1);
    }

    let input = &args[2];
    let result = match args[1].as_str() {
        "stack-item" => inspect_stack_item(input),
        "push" => inspect_push(input),
        "var-int" => inspect_var_int(input),
        other => {
            error!("Unknown command: {}\n", other);
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}

fn inspect_stack_item(input: &str) -> Result<(), String> {
    let text = match input.strip_prefix('@') {
        Some(path) => {
            debug!("Reading stack item from {}", path);
            fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?
        }
        None => input.to_string(),
    };
    let item: StackItem =
        serde_json::from_str(&text).map_err(|e| format!("Invalid stack item: {}", e))?;

    println!("{}", item);
    print_accessor("boolean", item.as_bool());
    print_accessor("integer", item.as_integer());
    print_accessor("address", item.as_address());
    print_accessor("string", item.as_string());
    print_accessor("hex", item.as_hex_string());
    print_accessor("list", item.as_list().map(|items| items.len()));
    print_accessor("map", item.as_map().map(|map| map.len()));
    print_accessor("pointer", item.as_pointer());
    print_accessor("iterator id", item.as_iterator_id());
    print_accessor("iterator", item.as_iterator().map(|items| items.len()));
    Ok(())
}

fn print_accessor<T: Display, E: Display>(name: &str, result: Result<T, E>) {
    match result {
        Ok(value) => println!("  {:<12} {}", name, value),
        Err(e) => println!("  {:<12} <{}>", name, e),
    }
}

fn inspect_push(input: &str) -> Result<(), String> {
    let script = hex::decode(input.trim_start_matches("0x"))
        .map_err(|e| format!("Invalid hex script: {}", e))?;
    let mut reader = BinaryReader::new(script);

    while reader.available() > 0 {
        let offset = reader.position();
        let line = next_push(&mut reader).map_err(|e| format!("At offset {}: {}", offset, e))?;
        println!("{:04} {}", offset, line);
    }
    Ok(())
}

/// Decodes one push instruction into a printable line.
fn next_push(reader: &mut BinaryReader) -> Result<String, CodecError> {
    let op = OpCode::try_from(reader.peek_u8()?)?;
    let line = match (op, op.operand()) {
        (_, Operand::Prefixed(_)) => {
            let data = reader.read_push_data()?;
            match std::str::from_utf8(&data) {
                Ok(text) if !text.is_empty() && text.chars().all(|c| !c.is_control()) => {
                    format!("{} {} ({:?})", op, hex::encode(&data), text)
                }
                _ => format!("{} {}", op, hex::encode(&data)),
            }
        }
        (OpCode::PushA, Operand::Fixed(_)) => {
            reader.read_u8()?;
            format!("{} {:+}", op, reader.read_i32()?)
        }
        (_, Operand::Fixed(_)) => format!("{} {}", op, reader.read_push_big_integer()?),
        (OpCode::PushT | OpCode::PushF | OpCode::PushNull, Operand::None) => {
            reader.read_u8()?;
            op.to_string()
        }
        (_, Operand::None) => format!("{} {}", op, reader.read_push_big_integer()?),
    };
    Ok(line)
}

fn inspect_var_int(input: &str) -> Result<(), String> {
    let value: u64 = input
        .parse()
        .map_err(|_| format!("Invalid value: '{}' is not an unsigned 64-bit integer", input))?;
    let encoded = var_int::encode(value);
    println!("{} ({} bytes)", hex::encode(&encoded), var_int::encoded_size(value));
    Ok(())
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> <input>", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  stack-item <json|@file>  Decode a stack item and try every accessor");
    eprintln!("  push <hex>               Print the literals of a push-only script");
    eprintln!("  var-int <n>              Print the VarInt encoding of n");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  NEO_CODEC_LOG            Minimum log level (debug, info, warn, error)");
    eprintln!("  NEO_CODEC_LOG_TIMESTAMP  Set to 0 to hide log timestamps");
}
