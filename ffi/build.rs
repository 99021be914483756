use std::env;
use std::path::PathBuf;

/// Directory to copy `todo_store.h` into, for C consumers building
/// against the source tree. Unset by default so packaging stays clean.
const EXPORT_ENV: &str = "TODO_FFI_HEADER_DIR";

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let header = out_dir.join("todo_store.h");

    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");
    println!("cargo:rerun-if-env-changed={EXPORT_ENV}");

    let bindings = match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("TODO_STORE_H")
        .generate()
    {
        Ok(bindings) => bindings,
        Err(err) => {
            println!("cargo:warning=skipping todo_store.h generation: {err}");
            return;
        }
    };

    bindings.write_to_file(&header);
    println!("cargo:rustc-env=TODO_FFI_HEADER_PATH={}", header.display());

    if let Some(dir) = env::var_os(EXPORT_ENV) {
        let dir = PathBuf::from(dir);
        let copied = std::fs::create_dir_all(&dir)
            .and_then(|()| std::fs::copy(&header, dir.join("todo_store.h")));
        if let Err(err) = copied {
            println!("cargo:warning=cannot export todo_store.h to {}: {err}", dir.display());
        }
    }
}
