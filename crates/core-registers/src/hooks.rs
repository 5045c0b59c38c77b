use core_regex::{Regex, RegexError};

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("invalid hook pattern: {0}")]
    Pattern(#[from] RegexError),
}

struct Hook<Ctx> {
    pattern: Regex,
    body: Box<dyn Fn(&str, &mut Ctx) -> Result<(), String>>,
}

/// Registers callbacks fired when `run_hook` is called with a matching
/// name and a string payload matching the hook's pattern. A hook body's
/// error never aborts the calling command; it is logged and discarded.
pub struct HookManager<Ctx> {
    hooks: std::collections::HashMap<String, Vec<Hook<Ctx>>>,
    disabled: bool,
}

impl<Ctx> Default for HookManager<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> HookManager<Ctx> {
    pub fn new() -> Self {
        HookManager {
            hooks: std::collections::HashMap::new(),
            disabled: false,
        }
    }

    pub fn add_hook(
        &mut self,
        name: impl Into<String>,
        pattern: &str,
        body: impl Fn(&str, &mut Ctx) -> Result<(), String> + 'static,
    ) -> Result<(), HookError> {
        let pattern = Regex::new(pattern)?;
        self.hooks
            .entry(name.into())
            .or_default()
            .push(Hook { pattern, body: Box::new(body) });
        Ok(())
    }

    /// Fires every hook registered under `name` whose pattern matches
    /// `param`. Disabled hook dispatch (a scoped boolean the caller toggles
    /// around e.g. macro replay) is a silent no-op, not an error.
    pub fn run_hook(&self, name: &str, param: &str, ctx: &mut Ctx) {
        if self.disabled {
            return;
        }
        let Some(hooks) = self.hooks.get(name) else {
            return;
        };
        let chars: Vec<char> = param.chars().collect();
        for hook in hooks {
            if !hook.pattern.is_match(&chars) {
                continue;
            }
            if let Err(message) = (hook.body)(param, ctx) {
                tracing::warn!(target: "debug", hook = name, error = %message, "hook body error swallowed");
            }
        }
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_fires_only_when_pattern_matches_payload() {
        let mut hooks: HookManager<Vec<String>> = HookManager::new();
        hooks
            .add_hook("InsertEnd", r"\.rs$", |param, ctx: &mut Vec<String>| {
                ctx.push(param.to_string());
                Ok(())
            })
            .unwrap();

        let mut log = Vec::new();
        hooks.run_hook("InsertEnd", "main.rs", &mut log);
        hooks.run_hook("InsertEnd", "main.py", &mut log);
        assert_eq!(log, vec!["main.rs".to_string()]);
    }

    #[test]
    fn errors_from_a_hook_body_are_swallowed_not_propagated() {
        let mut hooks: HookManager<()> = HookManager::new();
        hooks
            .add_hook("NormalKey", ".*", |_param, _ctx| Err("boom".to_string()))
            .unwrap();
        hooks.run_hook("NormalKey", "x", &mut ());
    }

    #[test]
    fn disabling_hooks_suppresses_dispatch() {
        let mut hooks: HookManager<Vec<String>> = HookManager::new();
        hooks
            .add_hook("X", ".*", |param, ctx: &mut Vec<String>| {
                ctx.push(param.to_string());
                Ok(())
            })
            .unwrap();
        hooks.set_disabled(true);
        let mut log = Vec::new();
        hooks.run_hook("X", "anything", &mut log);
        assert!(log.is_empty());
    }
}
