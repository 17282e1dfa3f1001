// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: recipe file
fn recipe_arg() -> Arg {
    Arg::new("recipe")
        .required(true)
        .value_name("RECIPE")
        .help("Path to the recipe file")
}

/// Common argument: bin directory
fn bin_dir_arg() -> Arg {
    Arg::new("bin_dir")
        .short('b')
        .long("bin-dir")
        .value_name("DIR")
        .help("Directory binaries are installed into")
}

fn os_arg() -> Arg {
    Arg::new("os")
        .long("os")
        .value_name("OS")
        .help("Resolve for this operating system instead of the running one")
}

fn arch_arg() -> Arg {
    Arg::new("arch")
        .long("arch")
        .value_name("ARCH")
        .help("Resolve for this architecture instead of the running one")
}

fn build_cli() -> Command {
    Command::new("tapster")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Tapster Contributors")
        .about("Install prebuilt binary releases from declarative recipes")
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .global(true)
                .help("Configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Show debug output"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Only show warnings and errors"),
        )
        .subcommand(
            Command::new("install")
                .about("Download and install the binaries a recipe describes")
                .arg(recipe_arg())
                .arg(bin_dir_arg())
                .arg(
                    Arg::new("no_verify")
                        .long("no-verify")
                        .action(ArgAction::SetTrue)
                        .help("Skip the recipe's test step"),
                )
                .arg(os_arg())
                .arg(arch_arg()),
        )
        .subcommand(
            Command::new("resolve")
                .about("Print the download URL a recipe resolves to")
                .arg(recipe_arg())
                .arg(os_arg())
                .arg(arch_arg()),
        )
        .subcommand(
            Command::new("test")
                .about("Run a recipe's test step against the installed binary")
                .arg(recipe_arg())
                .arg(bin_dir_arg()),
        )
        .subcommand(
            Command::new("validate")
                .about("Parse and validate a recipe")
                .arg(recipe_arg()),
        )
        .subcommand(
            Command::new("info")
                .about("Show recipe metadata and platform rules")
                .arg(recipe_arg()),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=OUT_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = out_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("tapster.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
