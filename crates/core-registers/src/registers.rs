use std::collections::HashMap;

/// Static and dynamic named registers.
///
/// Contract: reading a register always returns at least one string; an
/// absent register reads as a single empty string. Writing `N` strings and
/// reading against `M` selections yields, for selection index `i`, the
/// value at `min(i, N-1)`.
pub struct RegisterTable<Ctx> {
    static_regs: HashMap<char, Vec<String>>,
    dynamic: HashMap<char, Box<dyn Fn(&Ctx) -> Vec<String>>>,
}

impl<Ctx> Default for RegisterTable<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> RegisterTable<Ctx> {
    pub fn new() -> Self {
        RegisterTable {
            static_regs: HashMap::new(),
            dynamic: HashMap::new(),
        }
    }

    pub fn write(&mut self, reg: char, values: Vec<String>) {
        let values = if values.is_empty() {
            vec![String::new()]
        } else {
            values
        };
        self.static_regs.insert(reg, values);
    }

    /// Installs a callback-backed register (`%`, `.`, `#`, `0..9`, ...).
    /// Shadows any static value previously written to the same name.
    pub fn register_dynamic(&mut self, reg: char, f: impl Fn(&Ctx) -> Vec<String> + 'static) {
        self.dynamic.insert(reg, Box::new(f));
    }

    /// All values held by `reg`, always non-empty.
    pub fn read(&self, reg: char, ctx: &Ctx) -> Vec<String> {
        if let Some(f) = self.dynamic.get(&reg) {
            let values = f(ctx);
            if values.is_empty() {
                vec![String::new()]
            } else {
                values
            }
        } else {
            self.static_regs
                .get(&reg)
                .cloned()
                .unwrap_or_else(|| vec![String::new()])
        }
    }

    /// The value `reg` contributes to selection `index` out of
    /// `selection_count` total selections: `values[min(index, N-1)]`.
    pub fn read_for_selection(&self, reg: char, ctx: &Ctx, index: usize) -> String {
        let values = self.read(reg, ctx);
        let last = values.len() - 1;
        values[index.min(last)].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_register_reads_as_empty_string() {
        let table: RegisterTable<()> = RegisterTable::new();
        assert_eq!(table.read('"', &()), vec![String::new()]);
    }

    #[test]
    fn reading_past_the_written_list_clamps_to_the_last_entry() {
        let mut table: RegisterTable<()> = RegisterTable::new();
        table.write('"', vec!["a".into(), "b".into()]);
        assert_eq!(table.read_for_selection('"', &(), 0), "a");
        assert_eq!(table.read_for_selection('"', &(), 1), "b");
        assert_eq!(table.read_for_selection('"', &(), 5), "b");
    }

    #[test]
    fn dynamic_register_is_computed_on_read() {
        let mut table: RegisterTable<i32> = RegisterTable::new();
        table.register_dynamic('%', |ctx| vec![format!("buffer-{ctx}")]);
        assert_eq!(table.read('%', &7), vec!["buffer-7".to_string()]);
    }

    #[test]
    fn empty_write_still_reads_as_one_empty_string() {
        let mut table: RegisterTable<()> = RegisterTable::new();
        table.write('a', vec![]);
        assert_eq!(table.read('a', &()), vec![String::new()]);
    }
}
