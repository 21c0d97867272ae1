fn main() {
    let args = std::env::args().skip(1).collect::<Vec<_>>();

    match args.first().map(String::as_str) {
        Some("codegen") => codegen(),
        Some("check") => check(),
        _ => help(),
    }
}

const GENERATE: &str = "run --release --bin generate-ast -- -s schema/lox.ast";

fn codegen() {
    cargo(&format!("{GENERATE} generated"));
}

fn check() {
    cargo(&format!("{GENERATE} --check generated"));
}

fn help() {
    let s = "
usage: cargo x <command>

commands:
    codegen    regenerate the committed Lox AST classes in `generated/`
    check      fail if `generated/` is out of date with `schema/lox.ast`
";
    eprint!("{s}");

    std::process::exit(1);
}

fn cargo(s: &str) {
    cmd(&format!("cargo {s}"))
}

fn cmd(cmd: impl AsRef<str>) {
    let cmd = cmd.as_ref();
    let mut parts = cmd.split_ascii_whitespace();
    let Some(cmd) = parts.next() else {
        return;
    };
    let args = parts;

    let mut p = std::process::Command::new(cmd)
        .args(args)
        .stdout(std::io::stdout())
        .stderr(std::io::stderr())
        .spawn()
        .expect("failed to spawn cmd");
    let status = p.wait().expect("failed to run command");
    if !status.success() {
        eprintln!("command exited with non-zero exit code");
        std::process::exit(1);
    }
}
