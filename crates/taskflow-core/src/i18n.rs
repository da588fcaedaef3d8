//! UI Labels
//!
//! The fixed strings of the navigation and page headers in every supported
//! language. Anything not listed stays in English.

use crate::domain::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Welcome,
    Dashboard,
    Board,
    Calendar,
    Timeline,
    List,
    Projects,
    Tasks,
    Files,
    Messages,
    Notifications,
    Pomodoro,
    Admin,
    Settings,
    SignOut,
}

impl Label {
    pub const ALL: [Label; 15] = [
        Label::Welcome,
        Label::Dashboard,
        Label::Board,
        Label::Calendar,
        Label::Timeline,
        Label::List,
        Label::Projects,
        Label::Tasks,
        Label::Files,
        Label::Messages,
        Label::Notifications,
        Label::Pomodoro,
        Label::Admin,
        Label::Settings,
        Label::SignOut,
    ];
}

pub fn text(language: Language, label: Label) -> &'static str {
    match language {
        Language::En => english(label),
        Language::Es => spanish(label),
    }
}

fn english(label: Label) -> &'static str {
    match label {
        Label::Welcome => "Welcome to TaskFlow",
        Label::Dashboard => "Dashboard",
        Label::Board => "Board",
        Label::Calendar => "Calendar",
        Label::Timeline => "Timeline",
        Label::List => "List",
        Label::Projects => "Projects",
        Label::Tasks => "Tasks",
        Label::Files => "Files",
        Label::Messages => "Messages",
        Label::Notifications => "Notifications",
        Label::Pomodoro => "Pomodoro",
        Label::Admin => "Admin",
        Label::Settings => "Settings",
        Label::SignOut => "Sign out",
    }
}

fn spanish(label: Label) -> &'static str {
    match label {
        Label::Welcome => "Bienvenido a TaskFlow",
        Label::Dashboard => "Panel de Control",
        Label::Board => "Tablero",
        Label::Calendar => "Calendario",
        Label::Timeline => "Cronología",
        Label::List => "Lista",
        Label::Projects => "Proyectos",
        Label::Tasks => "Tareas",
        Label::Files => "Archivos",
        Label::Messages => "Mensajes",
        Label::Notifications => "Notificaciones",
        Label::Pomodoro => "Pomodoro",
        Label::Admin => "Administrador",
        Label::Settings => "Ajustes",
        Label::SignOut => "Cerrar sesión",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_follow_language() {
        assert_eq!(text(Language::En, Label::Settings), "Settings");
        assert_eq!(text(Language::Es, Label::Settings), "Ajustes");
        assert_eq!(text(Language::default(), Label::Admin), "Admin");
    }

    #[test]
    fn test_every_label_is_translated() {
        for label in Label::ALL {
            assert!(!text(Language::En, label).is_empty());
            assert!(!text(Language::Es, label).is_empty());
        }
        let translated = Label::ALL
            .into_iter()
            .filter(|l| text(Language::En, *l) != text(Language::Es, *l))
            .count();
        // Pomodoro reads the same in both
        assert_eq!(translated, Label::ALL.len() - 1);
    }
}
