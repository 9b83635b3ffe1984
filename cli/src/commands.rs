use std::path::PathBuf;

pub const HELP: &str = "\
Commandes :
  <texte>          poser une question sur le PDF attaché
  /attach <chemin> choisir un PDF (sélecteur de fichier)
  /drop <chemin>   glisser-déposer un PDF
  /detach          retirer le PDF de la discussion
  /new             nouvelle discussion
  /list            lister les discussions
  /switch <n>      ouvrir la discussion n
  /delete [n]      supprimer la discussion n (ou l'active)
  /help            afficher cette aide
  /quit            quitter";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Attach(PathBuf),
    Drop(PathBuf),
    Detach,
    New,
    List,
    Switch(usize),
    Delete(Option<usize>),
    Help,
    Quit,
    Invalid(String),
}

pub fn parse(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Ask(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "attach" | "a" => path_arg(arg, Command::Attach, "/attach <chemin>"),
        "drop" => path_arg(arg, Command::Drop, "/drop <chemin>"),
        "detach" => Command::Detach,
        "new" | "n" => Command::New,
        "list" | "ls" => Command::List,
        "switch" | "s" => match index_arg(arg) {
            Some(index) => Command::Switch(index),
            None => Command::Invalid("usage: /switch <n>".to_string()),
        },
        "delete" | "rm" if arg.is_empty() => Command::Delete(None),
        "delete" | "rm" => match index_arg(arg) {
            Some(index) => Command::Delete(Some(index)),
            None => Command::Invalid("usage: /delete [n]".to_string()),
        },
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        // Not a command name: the slash is part of the question
        _ => Command::Ask(line.to_string()),
    }
}

fn path_arg(arg: &str, make: fn(PathBuf) -> Command, usage: &str) -> Command {
    let arg = arg.trim_matches(|c| c == '"' || c == '\'');
    if arg.is_empty() {
        Command::Invalid(format!("usage: {}", usage))
    } else {
        make(PathBuf::from(arg))
    }
}

/// Parses a 1-based list position into a 0-based index.
fn index_arg(arg: &str) -> Option<usize> {
    arg.parse::<usize>().ok().filter(|n| *n > 0).map(|n| n - 1)
}
