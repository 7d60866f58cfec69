mod state;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono_tz::Tz;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use engine::{ExpenseStore, ListController, SessionProvider, editor, fetcher, summary};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    config::{self, AppConfig},
    error::{AppError, Result},
    ui,
};

pub use state::{
    AppEvent, AppState, Command, FormField, FormView, LoginField, Screen, ToastLevel, ToastState,
};

pub struct App {
    tz: Tz,
    store: Arc<dyn ExpenseStore>,
    session: Arc<dyn SessionProvider>,
    tx: UnboundedSender<AppEvent>,
    rx: UnboundedReceiver<AppEvent>,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn ExpenseStore>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let changed = tx.clone();
        let list = ListController::new().on_data_changed(Box::new(move || {
            let _ = changed.send(AppEvent::DataChanged);
        }));
        let state = AppState::new(list, config.email.clone(), config.supabase_url.clone());

        Self {
            tz: config.tz(),
            store,
            session,
            tx,
            rx,
            state,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            while let Ok(app_event) = self.rx.try_recv() {
                let commands = self.state.handle_event(app_event);
                self.dispatch(commands);
            }
            self.state.tick(Instant::now());

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = ui::keymap::map_key(key, self.state.accepts_text());
        let today = config::today(self.tz);
        let commands = self
            .state
            .handle_action(action, self.session.as_ref(), today);
        self.dispatch(commands);
    }

    /// Runs each command on its own task; results come back over the
    /// channel and are applied on the next loop iteration.
    fn dispatch(&mut self, commands: Vec<Command>) {
        for command in commands {
            let tx = self.tx.clone();
            let store = Arc::clone(&self.store);
            let session = Arc::clone(&self.session);
            match command {
                Command::Quit => self.should_quit = true,
                Command::SignIn { email, password } => {
                    tokio::spawn(async move {
                        let result = session.sign_in(&email, &password).await;
                        let _ = tx.send(AppEvent::SignedIn(result));
                    });
                }
                Command::SignOut => {
                    tokio::spawn(async move {
                        let result = session.sign_out().await;
                        let _ = tx.send(AppEvent::SignedOut(result));
                    });
                }
                Command::Fetch(ticket) => {
                    tokio::spawn(async move {
                        let fetched = fetcher::fetch(store.as_ref(), ticket).await;
                        let _ = tx.send(AppEvent::Page(fetched));
                    });
                }
                Command::LoadBalance(seq) => {
                    tokio::spawn(async move {
                        let result = summary::fetch_balance(store.as_ref()).await;
                        let _ = tx.send(AppEvent::Balance { seq, result });
                    });
                }
                Command::Load(id) => {
                    tokio::spawn(async move {
                        let result = editor::load_record(store.as_ref(), id).await;
                        let _ = tx.send(AppEvent::Loaded { id, result });
                    });
                }
                Command::Save(submission) => {
                    tokio::spawn(async move {
                        let result = submission.execute(store.as_ref()).await;
                        let _ = tx.send(AppEvent::Saved(result));
                    });
                }
                Command::Delete(confirmed) => {
                    tokio::spawn(async move {
                        let result = confirmed.execute(store.as_ref(), session.as_ref()).await;
                        let _ = tx.send(AppEvent::Deleted(result));
                    });
                }
            }
        }
    }
}
