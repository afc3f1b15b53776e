use std::fs;
use std::io;
use std::path::Path;

/// Copies the trunk bundle into `static/dist` for `include_dir!`. The target
/// directory always exists so the host builds before the frontend does.
fn main() -> io::Result<()> {
    let out_dir = Path::new("static");
    let dist_dir = Path::new("../frontend/dist");

    if dist_dir.exists() {
        let _ = fs::remove_dir_all(out_dir);
        fs::create_dir_all(out_dir)?;
        fs_extra::dir::copy(
            dist_dir,
            out_dir,
            &fs_extra::dir::CopyOptions::new().overwrite(true).copy_inside(true),
        )
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    }
    fs::create_dir_all(out_dir.join("dist"))?;
    println!("cargo:rerun-if-changed=../frontend/dist");
    Ok(())
}
