//! Build script that locates the system `OpenCV` and prints installation hints.
//!
//! The `opencv` crate does the actual linking; this only surfaces a readable
//! warning before its much noisier failure. It also reminds about the Haar
//! cascade files the binaries load at startup.

use std::path::Path;
use std::process::Command;

const OPENCV_PACKAGES: [&str; 2] = ["opencv4", "opencv"];
const CASCADE_FILES: [&str; 2] = ["haarcascade_frontalface_default.xml", "haarcascade_eye.xml"];
const CASCADE_DIRS: [&str; 6] = [
    "assets",
    "/usr/share/opencv4/haarcascades",
    "/usr/share/opencv/haarcascades",
    "/usr/local/share/opencv4/haarcascades",
    "/opt/homebrew/share/opencv4/haarcascades",
    "/opt/local/share/opencv4/haarcascades",
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");
    println!("cargo:rerun-if-env-changed=OPENCV_LINK_PATHS");
    println!("cargo:rerun-if-env-changed=OPENCV_INCLUDE_PATHS");

    if pkg_config_version(&["--version"]).is_none() {
        println!("cargo:warning=pkg-config not found. It is needed to locate OpenCV.");
        println!("cargo:warning=On Ubuntu: sudo apt-get install pkg-config");
        println!("cargo:warning=On macOS: brew install pkg-config");
        return;
    }

    match OPENCV_PACKAGES
        .iter()
        .find_map(|package| pkg_config_version(&["--modversion", package]))
    {
        Some(version) => println!("cargo:warning=Found OpenCV version: {version}"),
        None => {
            println!("cargo:warning=OpenCV not found via pkg-config.");
            println!("cargo:warning=On Ubuntu: sudo apt-get install libopencv-dev");
            println!("cargo:warning=On macOS: brew install opencv");
        }
    }

    for cascade in CASCADE_FILES {
        if !CASCADE_DIRS.iter().any(|dir| Path::new(dir).join(cascade).exists()) {
            println!("cargo:warning={cascade} not found in assets/ or the OpenCV data directories");
        }
    }
}

fn pkg_config_version(args: &[&str]) -> Option<String> {
    let output = Command::new("pkg-config").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
