use folio_core::{AppError, AppResult};
use folio_domain::ResourcePath;

const USAGE: &str = "usage: folio-accessctl <acl <path> | effective <path> <principal> | \
lock <path> <user> | steal <path> <user> | unlock <path> <user> [--force] | \
editable <path> <user> | locks <folder>>";

/// One administrative command read from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Acl {
        resource: ResourcePath,
    },
    Effective {
        resource: ResourcePath,
        principal: String,
    },
    Lock {
        resource: ResourcePath,
        user: String,
    },
    Steal {
        resource: ResourcePath,
        user: String,
    },
    Unlock {
        resource: ResourcePath,
        user: String,
        force: bool,
    },
    Editable {
        resource: ResourcePath,
        user: String,
    },
    Locks {
        folder: ResourcePath,
    },
}

impl Command {
    pub fn parse<I>(args: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        let words: Vec<&str> = args.iter().map(String::as_str).collect();

        match words.as_slice() {
            ["acl", resource] => Ok(Self::Acl {
                resource: resource.parse()?,
            }),
            ["effective", resource, principal] => Ok(Self::Effective {
                resource: resource.parse()?,
                principal: (*principal).to_owned(),
            }),
            ["lock", resource, user] => Ok(Self::Lock {
                resource: resource.parse()?,
                user: (*user).to_owned(),
            }),
            ["steal", resource, user] => Ok(Self::Steal {
                resource: resource.parse()?,
                user: (*user).to_owned(),
            }),
            ["unlock", resource, user] => Ok(Self::Unlock {
                resource: resource.parse()?,
                user: (*user).to_owned(),
                force: false,
            }),
            ["unlock", resource, user, "--force"] => Ok(Self::Unlock {
                resource: resource.parse()?,
                user: (*user).to_owned(),
                force: true,
            }),
            ["editable", resource, user] => Ok(Self::Editable {
                resource: resource.parse()?,
                user: (*user).to_owned(),
            }),
            ["locks", folder] => {
                let folder: ResourcePath = folder.parse()?;
                if !folder.is_folder() {
                    return Err(AppError::Validation(format!(
                        "'{folder}' is not a folder path"
                    )));
                }
                Ok(Self::Locks { folder })
            }
            _ => Err(AppError::Validation(USAGE.to_owned())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Acl { .. } => "acl",
            Self::Effective { .. } => "effective",
            Self::Lock { .. } => "lock",
            Self::Steal { .. } => "steal",
            Self::Unlock { .. } => "unlock",
            Self::Editable { .. } => "editable",
            Self::Locks { .. } => "locks",
        }
    }
}

#[cfg(test)]
mod tests {
    use folio_core::AppError;

    use super::Command;

    fn parse(words: &[&str]) -> Result<Command, AppError> {
        Command::parse(words.iter().map(|word| (*word).to_owned()))
    }

    #[test]
    fn unlock_accepts_force_flag() {
        let parsed = parse(&["unlock", "/x.html", "alice", "--force"]);
        assert!(matches!(parsed, Ok(Command::Unlock { force: true, .. })));

        let parsed = parse(&["unlock", "/x.html", "alice"]);
        assert!(matches!(parsed, Ok(Command::Unlock { force: false, .. })));
    }

    #[test]
    fn paths_are_validated() {
        let parsed = parse(&["acl", "x.html"]);
        assert!(matches!(parsed, Err(AppError::Validation(_))));

        let parsed = parse(&["locks", "/x.html"]);
        assert!(matches!(parsed, Err(AppError::Validation(_))));
    }

    #[test]
    fn unknown_commands_print_usage() {
        let parsed = parse(&["publish", "/x.html"]);
        assert!(matches!(
            parsed,
            Err(AppError::Validation(message)) if message.starts_with("usage:")
        ));
        assert!(matches!(parse(&[]), Err(AppError::Validation(_))));
    }

    #[test]
    fn command_names_match_their_keyword() {
        let parsed = parse(&["editable", "/a/b.html", "bob"]);
        assert_eq!(parsed.map(|command| command.name()).ok(), Some("editable"));
    }
}
