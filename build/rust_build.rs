/**
 * Generates Rust types for the numbering-plan schema stored in /resources.
 */

use std::path::Path;

use thiserror::Error;

const PROTO_INCLUDE_DIR: &str = "resources";
const PROTO_INPUTS: [&str; 2] = [
    "resources/phonemetadata.proto",
    "resources/phonenumber.proto",
];

#[derive(Debug, Error)]
enum BuildError {
    #[error("Proto schema '{path}' is missing")]
    MissingSchema { path: String },

    #[error("IO error occurred: {0}")]
    IO(#[from] std::io::Error),
}

fn check_schemas() -> Result<(), BuildError> {
    for input in PROTO_INPUTS {
        let path = Path::new(input);
        if !path.try_exists()? {
            return Err(BuildError::MissingSchema { path: input.to_string() });
        }
        println!("cargo:rerun-if-changed={}", input);
    }
    Ok(())
}

fn main() -> Result<(), BuildError> {
    check_schemas()?;
    protobuf_codegen::Codegen::new()
        .pure()
        .includes([PROTO_INCLUDE_DIR])
        .inputs(PROTO_INPUTS)
        .cargo_out_dir("proto_gen")
        .run_from_script();
    Ok(())
}
