/// Handler a command name dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Start,
    Help,
    Search,
    Buy,
}

/// Entry in the command table
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub kind: CommandKind,
}

impl CommandSpec {
    pub fn matches(&self, input: &str) -> bool {
        self.name.eq_ignore_ascii_case(input)
    }
}

/// The full command surface of the storefront
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "start",
        description: "Показать каталог доменов",
        usage: "/start",
        kind: CommandKind::Start,
    },
    CommandSpec {
        name: "search",
        description: "Найти домены по ключевому слову",
        usage: "/search ключевое_слово",
        kind: CommandKind::Search,
    },
    CommandSpec {
        name: "buy",
        description: "Инструкция по покупке домена",
        usage: "/buy",
        kind: CommandKind::Buy,
    },
    CommandSpec {
        name: "help",
        description: "Меню навигации",
        usage: "/help",
        kind: CommandKind::Help,
    },
];

/// Look up a command by name, ignoring ASCII case
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.matches(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(find("SEARCH").map(|c| c.kind), Some(CommandKind::Search));
        assert_eq!(find("start").map(|c| c.kind), Some(CommandKind::Start));
        assert!(find("version").is_none());
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<_> = COMMANDS.iter().map(|c| c.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), COMMANDS.len());
    }
}
