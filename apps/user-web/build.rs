//! `proto/user.proto` から User Service の gRPC クライアントを生成する

use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=../../proto/user.proto");

    // システムの protoc に依存しないよう同梱版を使う
    // SAFETY: ビルドスクリプトは単一スレッドで実行される
    unsafe {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    let includes = [
        PathBuf::from("../../proto"),
        // google/protobuf/empty.proto
        protoc_bin_vendored::include_path()?,
    ];

    tonic_prost_build::configure()
        .build_server(false)
        .build_client(true)
        .compile_protos(&[PathBuf::from("../../proto/user.proto")], &includes)?;

    Ok(())
}
