use common::Language;
use serde_json::Value;

use crate::errors::StartupError;

pub const USAGE: &str = "storefront [status | language [<code>] | draft show|save|load|clear|submit | draft set <field>=<value>...]";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Status,
    Language(Option<Language>),
    DraftShow,
    /// Load the saved draft, merge the fields, save again.
    DraftSet(Vec<(String, Value)>),
    DraftSave,
    DraftLoad,
    DraftClear,
    DraftSubmit,
}

impl Command {
    /// Parse the arguments after the program name.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, StartupError> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        match args.as_slice() {
            [] | ["status"] => Ok(Command::Status),
            ["language"] => Ok(Command::Language(None)),
            ["language", code] => code
                .parse::<Language>()
                .map(|l| Command::Language(Some(l)))
                .map_err(|e| StartupError::Usage(e.to_string())),
            ["draft"] | ["draft", "show"] => Ok(Command::DraftShow),
            ["draft", "save"] => Ok(Command::DraftSave),
            ["draft", "load"] => Ok(Command::DraftLoad),
            ["draft", "clear"] => Ok(Command::DraftClear),
            ["draft", "submit"] => Ok(Command::DraftSubmit),
            ["draft", "set", pairs @ ..] if !pairs.is_empty() => {
                pairs.iter().map(|p| parse_field(p)).collect::<Result<Vec<_>, _>>().map(Command::DraftSet)
            }
            _ => Err(StartupError::Usage(USAGE.to_string())),
        }
    }
}

/// `field=value`; the value is taken as JSON when it parses, as text otherwise.
fn parse_field(pair: &str) -> Result<(String, Value), StartupError> {
    let (field, raw) = pair
        .split_once('=')
        .ok_or_else(|| StartupError::Usage(format!("expected <field>=<value>, got {pair:?}")))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(StartupError::Usage(format!("empty field name in {pair:?}")));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((field.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse::<&str>(&[]).unwrap(), Command::Status);
        assert_eq!(Command::parse(&["language", "fr"]).unwrap(), Command::Language(Some(Language::Fr)));
        assert_eq!(Command::parse(&["draft"]).unwrap(), Command::DraftShow);
        assert_eq!(Command::parse(&["draft", "clear"]).unwrap(), Command::DraftClear);
    }

    #[test]
    fn draft_set_values_are_json_or_text() {
        let cmd = Command::parse(&["draft", "set", "name=Ada", "age=3", "tags=[\"a\"]", "note=a=b"]).unwrap();
        assert_eq!(
            cmd,
            Command::DraftSet(vec![
                ("name".into(), json!("Ada")),
                ("age".into(), json!(3)),
                ("tags".into(), json!(["a"])),
                ("note".into(), json!("a=b")),
            ])
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(Command::parse(&["language", "de"]), Err(StartupError::Usage(_))));
        assert!(Command::parse(&["draft", "set"]).is_err());
        assert!(Command::parse(&["draft", "set", "novalue"]).is_err());
        assert!(Command::parse(&["draft", "set", "=x"]).is_err());
        assert!(Command::parse(&["bogus"]).is_err());
    }
}
