//! Shell completion generation for scql
//!
//! Generates completion scripts for bash, zsh and fish, with dynamic
//! completion of `--root-type` from the record types in the config file.

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::CliArgs;
use crate::error::{ConfigError, GuesserError, Result};

/// Generate shell completion script
///
/// # Arguments
/// * `shell_name` - Shell type (bash, zsh, fish)
pub fn generate_completion(shell_name: &str) -> Result<()> {
    let shell = parse_shell(shell_name)?;
    print!("{}", completion_script(shell)?);
    Ok(())
}

/// Parse shell name string to Shell enum
fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        _ => Err(GuesserError::Config(ConfigError::InvalidValue {
            field: "shell".to_string(),
            value: format!("{} (supported shells: bash, zsh, fish)", shell_name),
        })),
    }
}

fn completion_script(shell: Shell) -> Result<String> {
    let base = base_completion(shell);
    let extra = match shell {
        Shell::Bash => BASH_ROOT_TYPE,
        Shell::Zsh => ZSH_ROOT_TYPE,
        Shell::Fish => FISH_ROOT_TYPE,
        other => {
            return Err(GuesserError::Generic(format!(
                "Unsupported shell: {}",
                other
            )));
        }
    };
    Ok(format!("{}\n{}", base, extra))
}

/// clap_complete output for the whole command tree
fn base_completion(shell: Shell) -> String {
    let mut cmd = CliArgs::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, "scql", &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

const BASH_ROOT_TYPE: &str = r#"
# Custom completion for record type names
_scql_list_types() {
    scql config --list-types 2>/dev/null
}

_scql_enhanced() {
    local cur prev words cword
    _init_completion || return

    if [[ "$prev" == "--root-type" ]]; then
        COMPREPLY=($(compgen -W "$(_scql_list_types)" -- "$cur"))
        return 0
    fi

    _scql "$@"
}

complete -F _scql_enhanced scql
"#;

const ZSH_ROOT_TYPE: &str = r#"
# Custom completion for record type names
_scql_list_types() {
    scql config --list-types 2>/dev/null
}

_scql_enhanced() {
    if [[ ${words[CURRENT-1]} == "--root-type" ]]; then
        local -a types
        types=($(_scql_list_types))
        _describe 'record types' types
        return 0
    fi

    _scql "$@"
}

compdef _scql_enhanced scql
"#;

const FISH_ROOT_TYPE: &str = r#"
# Custom completion for record type names
function __scql_list_types
    scql config --list-types 2>/dev/null
end

complete -c scql -l root-type -f -a "(__scql_list_types)" -d "Record type from config file"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shell() {
        assert!(matches!(parse_shell("bash"), Ok(Shell::Bash)));
        assert!(matches!(parse_shell("zsh"), Ok(Shell::Zsh)));
        assert!(matches!(parse_shell("fish"), Ok(Shell::Fish)));
        assert!(parse_shell("invalid").is_err());
    }

    #[test]
    fn test_parse_shell_case_insensitive() {
        assert!(matches!(parse_shell("BASH"), Ok(Shell::Bash)));
        assert!(matches!(parse_shell("Zsh"), Ok(Shell::Zsh)));
        assert!(matches!(parse_shell("FiSh"), Ok(Shell::Fish)));
    }

    #[test]
    fn test_scripts_complete_root_type() {
        let bash = completion_script(Shell::Bash).unwrap();
        assert!(bash.contains("_scql_list_types"));
        assert!(bash.contains("complete -F _scql_enhanced scql"));

        let fish = completion_script(Shell::Fish).unwrap();
        assert!(fish.contains("-l root-type"));
        assert!(completion_script(Shell::PowerShell).is_err());
    }
}
