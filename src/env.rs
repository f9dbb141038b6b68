use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// The shell's own mutable state, shared by builtins and process spawning.
///
/// - `vars`: snapshot of the process variables. `PATH` drives program lookup
///   and `HOME` is the target of a bare `cd`. Spawned programs inherit the
///   process environment itself.
/// - `current_dir`: working directory of the shell and of the programs it spawns.
///   Only the `cd` builtin changes it.
/// - `should_exit`: raised by `quit`; the executor and the read loop stop on it.
#[derive(Debug, Clone)]
pub struct Environment {
    pub vars: HashMap<String, String>,
    pub current_dir: PathBuf,
    pub should_exit: bool,
}

impl Environment {
    /// Snapshot of the current process variables and working directory.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_current_dir(current_dir)
    }

    /// Like [`Environment::new`], but starting in `current_dir`.
    pub fn with_current_dir(current_dir: PathBuf) -> Self {
        Self {
            vars: stdenv::vars().collect(),
            current_dir,
            should_exit: false,
        }
    }

    /// Looks up a variable, falling back to the live process environment.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    /// Text shown before each interactive line: the working directory.
    pub fn prompt(&self) -> String {
        format!("{} > ", self.current_dir.display())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::env::Environment;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn test_env_vars_shadow_process_env() {
        let mut env = Environment {
            vars: HashMap::new(),
            current_dir: PathBuf::from("/"),
            should_exit: false,
        };

        assert_eq!(env.get_var("MINSH_SURELY_UNSET_VARIABLE_4711"), None);

        env.vars.insert("PATH".to_string(), "/minsh/bin".to_string());
        assert_eq!(env.get_var("PATH"), Some("/minsh/bin".to_string()));
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
        assert!(!env.should_exit);
    }

    #[test]
    fn test_prompt_shows_current_dir() {
        let env = Environment::with_current_dir(PathBuf::from("/tmp"));
        assert_eq!(env.prompt(), "/tmp > ");
    }
}
