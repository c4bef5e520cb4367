use assert_cmd::Command;

pub fn scrub_cmd() -> Command {
	let mut cmd = Command::cargo_bin("scrub").expect("scrub binary should build");
	cmd.env("NO_COLOR", "1");
	cmd
}
