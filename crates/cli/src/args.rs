use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const USAGE: &str = "usage: track-cropper-cli <list | crop INDEX START END [DIR] | reset INDEX | download INDEX DIR>";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    List,
    Crop {
        index: usize,
        start: i64,
        end: i64,
        save_dir: Option<PathBuf>,
    },
    Reset {
        index: usize,
    },
    Download {
        index: usize,
        dir: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError(pub String);

impl Display for UsageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{USAGE}", self.0)
    }
}

impl std::error::Error for UsageError {}

/// Parses arguments without the program name.
pub fn parse<I, S>(args: I) -> Result<CliCommand, UsageError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let args: Vec<String> = args.into_iter().map(|arg| arg.as_ref().to_owned()).collect();
    let Some((name, rest)) = args.split_first() else {
        return Err(UsageError(String::from("missing command")));
    };

    match (name.as_str(), rest) {
        ("list", []) => Ok(CliCommand::List),
        ("crop", [index, start, end]) => Ok(CliCommand::Crop {
            index: number(index, "INDEX")?,
            start: number(start, "START")?,
            end: number(end, "END")?,
            save_dir: None,
        }),
        ("crop", [index, start, end, dir]) => Ok(CliCommand::Crop {
            index: number(index, "INDEX")?,
            start: number(start, "START")?,
            end: number(end, "END")?,
            save_dir: Some(PathBuf::from(dir)),
        }),
        ("reset", [index]) => Ok(CliCommand::Reset {
            index: number(index, "INDEX")?,
        }),
        ("download", [index, dir]) => Ok(CliCommand::Download {
            index: number(index, "INDEX")?,
            dir: PathBuf::from(dir),
        }),
        ("list" | "crop" | "reset" | "download", _) => {
            Err(UsageError(format!("wrong number of arguments for `{name}`")))
        }
        _ => Err(UsageError(format!("unknown command `{name}`"))),
    }
}

fn number<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T, UsageError> {
    raw.parse()
        .map_err(|_| UsageError(format!("{name} must be a number, got `{raw}`")))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{CliCommand, parse};

    #[test]
    fn parses_crop_with_optional_save_dir() {
        assert_eq!(
            parse(["crop", "2", "5", "40"]),
            Ok(CliCommand::Crop {
                index: 2,
                start: 5,
                end: 40,
                save_dir: None,
            })
        );
        assert_eq!(
            parse(["crop", "0", "-3", "9", "out"]),
            Ok(CliCommand::Crop {
                index: 0,
                start: -3,
                end: 9,
                save_dir: Some(PathBuf::from("out")),
            })
        );
    }

    #[test]
    fn parses_list_reset_and_download() {
        assert_eq!(parse(["list"]), Ok(CliCommand::List));
        assert_eq!(parse(["reset", "1"]), Ok(CliCommand::Reset { index: 1 }));
        assert_eq!(
            parse(["download", "1", "/tmp"]),
            Ok(CliCommand::Download {
                index: 1,
                dir: PathBuf::from("/tmp"),
            })
        );
    }

    #[test]
    fn rejects_bad_input() {
        let missing = parse(Vec::<String>::new()).expect_err("no command");
        assert!(missing.0.contains("missing command"));

        let arity = parse(["reset"]).expect_err("missing index");
        assert!(arity.0.contains("wrong number of arguments"));

        let index = parse(["reset", "-1"]).expect_err("negative index");
        assert!(index.0.contains("INDEX must be a number"));

        let unknown = parse(["split"]).expect_err("unknown command");
        assert!(unknown.to_string().contains("usage:"));
    }
}
