/// Side effects and their context
pub mod effect;

/// The three-field form
mod form;

pub use effect::{Effect, EffectContext};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use form::Form;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use registro_core::{api::crear, validate};
use std::process::ExitCode;

/// The "functional core" of the app.
pub struct App {
    /// Status to display (visible at the bottom of the screen)
    status_line: Option<Status>,

    /// The registration form
    form: Form,

    /// Whether a submission is in flight. While this is set, submitting
    /// again does nothing.
    submitting: bool,

    /// Exit code to finish with, once final effects are done
    exiting: Option<ExitCode>,
}

/// A status message and how to color it.
#[derive(Debug, PartialEq, Eq)]
enum Status {
    /// Good news, in green
    Ok(String),

    /// Bad news, in red
    Error(String),
}

/// Things that can happen to this app
#[derive(Debug)]
pub enum Action {
    /// The user did something on the keyboard
    Key(KeyEvent),

    /// The server confirmed the registration
    Registered(crear::Resp),

    /// Something bad happened; display it to the user
    Problem(String),
}

impl App {
    /// Create a new instance of the app
    pub fn new() -> Self {
        Self {
            status_line: None,
            form: Form::default(),
            submitting: false,
            exiting: None,
        }
    }

    /// Render the app's UI to the screen
    pub fn render(&self, frame: &mut Frame) {
        let vertical = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ]);
        let [title_area, body_area, status_area] = vertical.areas(frame.area());

        frame.render_widget(Paragraph::new("Registro de Usuario"), title_area);

        self.form.render(body_area, frame);

        let status = match (&self.status_line, self.submitting) {
            (_, true) => Paragraph::new("Cargando…"),
            (Some(Status::Ok(line)), _) => {
                Paragraph::new(line.as_str()).style(Style::default().fg(Color::Green))
            }
            (Some(Status::Error(line)), _) => {
                Paragraph::new(line.as_str()).style(Style::default().fg(Color::Red))
            }
            (None, _) => Paragraph::new("Tab: cambiar campo · Enter: registrar · Esc: salir"),
        };

        frame.render_widget(status, status_area);
    }

    /// Handle an `Action`, updating the app's state and producing some side
    /// effect(s)
    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Key(key) => self.handle_key(key),

            Action::Registered(resp) => {
                tracing::info!(message = %resp.message, "registered");

                self.submitting = false;
                self.form.clear();
                self.status_line =
                    Some(Status::Ok("Usuario registrado correctamente!".to_string()));

                vec![]
            }

            Action::Problem(problem) => {
                self.submitting = false;
                self.status_line = Some(Status::Error(format!("Error: {problem}")));

                vec![]
            }
        }
    }

    /// Keyboard handling: Enter submits, Esc asks to exit, everything else
    /// goes to the form.
    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.kind != KeyEventKind::Press {
            return vec![];
        }

        match key.code {
            KeyCode::Esc => {
                self.exiting = Some(ExitCode::SUCCESS);

                vec![]
            }
            KeyCode::Enter => self.submit(),
            _ => {
                self.form.handle_event(key);

                vec![]
            }
        }
    }

    /// Check the form the way the server will and kick off a submission.
    /// The local checks just save a round trip; the server re-validates
    /// everything and is the source of truth.
    fn submit(&mut self) -> Vec<Effect> {
        if self.submitting {
            return vec![];
        }

        let (nombre, dni, foto_path) = self.form.values();

        if nombre.trim().is_empty() || dni.trim().is_empty() || foto_path.trim().is_empty() {
            self.status_line = Some(Status::Error(
                "Por favor, llena todos los campos.".to_string(),
            ));

            return vec![];
        }

        if !validate::dni_length_ok(dni) {
            self.status_line = Some(Status::Error(
                "El DNI debe tener exactamente 8 caracteres.".to_string(),
            ));

            return vec![];
        }

        self.submitting = true;
        self.status_line = None;

        vec![Effect::Submit {
            nombre: nombre.trim().to_string(),
            dni: dni.trim().to_string(),
            foto_path: foto_path.trim().to_string(),
        }]
    }

    /// Let the TUI manager know whether we're all wrapped up and can exit.
    pub fn should_exit(&self) -> Option<ExitCode> {
        self.exiting
    }
}
