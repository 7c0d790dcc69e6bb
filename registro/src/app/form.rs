use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

/// Which field of the form the cursor is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    /// Full name
    Nombre,

    /// National ID
    Dni,

    /// Path to the photo
    Foto,
}

impl Field {
    /// Rotate through the fields (e.g. with tab)
    fn next(self) -> Self {
        match self {
            Self::Nombre => Self::Dni,
            Self::Dni => Self::Foto,
            Self::Foto => Self::Nombre,
        }
    }

    /// Rotate through the fields in reverse (e.g. with shift-tab)
    fn prev(self) -> Self {
        match self {
            Self::Nombre => Self::Foto,
            Self::Dni => Self::Nombre,
            Self::Foto => Self::Dni,
        }
    }
}

/// The registration form: the three fields the endpoint expects.
#[derive(Debug)]
pub struct Form {
    /// Which field we're editing
    active: Field,

    /// Full name
    nombre: Input,

    /// 8-character national ID
    dni: Input,

    /// Path to the photo to upload
    foto: Input,
}

impl Form {
    /// Render the three fields stacked vertically.
    pub fn render(&self, body_area: Rect, frame: &mut Frame<'_>) {
        let fields = Layout::vertical(Constraint::from_lengths([3, 3, 3]));
        let [nombre_area, dni_area, foto_area] = fields.areas(body_area);

        self.render_field(frame, nombre_area, "Nombre", &self.nombre, Field::Nombre);
        self.render_field(frame, dni_area, "DNI", &self.dni, Field::Dni);
        self.render_field(frame, foto_area, "Foto", &self.foto, Field::Foto);
    }

    /// Render one bordered input, placing the cursor in it if it's active.
    fn render_field(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        title: &str,
        input: &Input,
        field: Field,
    ) {
        let width = area.width.saturating_sub(3); // -2 for the border, -1 for the cursor
        let scroll = input.visual_scroll(width as usize);

        let widget = Paragraph::new(input.value())
            .scroll((0, scroll as u16))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title.to_string())
                    .border_style(Style::default().fg(Color::Blue)),
            );

        frame.render_widget(widget, area);

        if self.active == field {
            frame.set_cursor_position((
                area.x + (input.visual_cursor().max(scroll) - scroll) as u16 + 1, // just past the end of the text
                area.y + 1, // +1 row for the border/title
            ));
        }
    }

    /// Send keys to the active field; Tab and Shift-Tab move between fields.
    pub fn handle_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                self.active = self.active.next();
            }
            KeyCode::BackTab => {
                self.active = self.active.prev();
            }
            _ => {
                let event = Event::Key(key);

                match self.active {
                    Field::Nombre => self.nombre.handle_event(&event),
                    Field::Dni => self.dni.handle_event(&event),
                    Field::Foto => self.foto.handle_event(&event),
                };
            }
        }
    }

    /// Current field values, untrimmed.
    pub fn values(&self) -> (&str, &str, &str) {
        (self.nombre.value(), self.dni.value(), self.foto.value())
    }

    /// Clear every field, e.g. after a successful submission.
    pub fn clear(&mut self) {
        self.nombre.reset();
        self.dni.reset();
        self.foto.reset();
        self.active = Field::Nombre;
    }
}

impl Default for Form {
    fn default() -> Self {
        Self {
            active: Field::Nombre,
            nombre: Input::default(),
            dni: Input::default(),
            foto: Input::default(),
        }
    }
}
