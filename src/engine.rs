// Engine - the single-threaded event loop that owns the live page
//
// One mpsc channel feeds it everything: driver input, fetch completions,
// and timers. The engine is the only code that mutates the shell, so all
// validation and DOM-equivalent work runs to completion within one loop
// turn; the only suspension points are the fragment fetches, which run as
// detached tasks and re-enter the loop as FragmentLoaded events.

use crate::events::UiEvent;
use crate::fetch::FragmentFetcher;
use crate::form::submit::{self, SubmitOutcome};
use crate::fragment;
use crate::notify::ToastRack;
use crate::router::{self, Router};
use crate::routes::ROOT_HASH;
use crate::shell::Shell;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct Engine<F: FragmentFetcher> {
    shell: Shell,
    router: Router,
    fetcher: Arc<F>,
    toasts: ToastRack,
    events_tx: mpsc::Sender<UiEvent>,
    /// The current hash; the engine is the only writer
    hash: String,
}

impl<F: FragmentFetcher> Engine<F> {
    pub fn new(
        base_url: &str,
        fetcher: Arc<F>,
        toasts: ToastRack,
        events_tx: mpsc::Sender<UiEvent>,
    ) -> Self {
        Self {
            shell: Shell::new(),
            router: Router::new(base_url),
            fetcher,
            toasts,
            events_tx,
            hash: String::new(),
        }
    }

    /// Boot sequence. With an initial hash, load it; without one, enhance
    /// whatever the shell already shows and claim the root hash without a
    /// load.
    pub fn boot(&mut self, initial_hash: &str) {
        if initial_hash.is_empty() {
            self.shell.enhance();
            self.hash = ROOT_HASH.to_string();
        } else {
            self.navigate(initial_hash);
        }
    }

    /// Run until the channel closes or a Quit arrives
    pub async fn run(mut self, mut events_rx: mpsc::Receiver<UiEvent>) -> Result<()> {
        while let Some(event) = events_rx.recv().await {
            if !self.handle_event(event) {
                break;
            }
        }
        tracing::info!("engine stopped");
        Ok(())
    }

    /// Dispatch one event. Returns false when the engine should stop.
    ///
    /// Dispatch is delegated: each event names its target and the engine
    /// checks it against the currently mounted bindings, so fragment swaps
    /// never need to re-register anything per node.
    pub fn handle_event(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::HashChanged { hash } => self.navigate(&hash),
            UiEvent::LinkClicked { href } => match router::intercept_link(&href) {
                // Legacy link: suppress the page load and converge on the
                // same path a hash edit takes
                Some(hash) => self.navigate(hash),
                None => tracing::trace!("click on {href:?} not intercepted"),
            },
            UiEvent::FieldEdited { element_id, value } => {
                self.shell.edit_field(&element_id, &value);
            }
            UiEvent::NavTogglePressed => {
                self.shell.toggle_nav();
            }
            UiEvent::SubmitRequested { target } => self.submit(target.as_deref()),
            UiEvent::FragmentLoaded { seq, fragment } => {
                if self.router.is_current(seq) {
                    self.shell.swap(fragment);
                    tracing::info!(seq, title = %self.shell.title, "fragment swapped");
                } else {
                    tracing::debug!(seq, "stale fragment discarded");
                }
            }
            UiEvent::SuccessExpired { generation } => {
                self.shell.expire_success(generation);
            }
            UiEvent::PrintState => println!("{}", self.describe()),
            UiEvent::Quit => return false,
        }
        true
    }

    /// Load the fragment for a hash. Fire-and-forget: the fetch runs in a
    /// detached task with no timeout and no cancellation; its completion
    /// re-enters the loop carrying the sequence number that decides whether
    /// it may still swap.
    fn navigate(&mut self, hash: &str) {
        let hash = if hash.is_empty() { ROOT_HASH } else { hash };
        self.hash = hash.to_string();

        let nav = self.router.begin(hash);
        let fetcher = self.fetcher.clone();
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let loaded = fetcher
                .fetch(nav.url.clone())
                .await
                .and_then(|text| fragment::parse(&text));
            match loaded {
                Ok(fragment) => {
                    let _ = events_tx
                        .send(UiEvent::FragmentLoaded {
                            seq: nav.seq,
                            fragment,
                        })
                        .await;
                }
                // Load failures leave the previous page in place: log and
                // move on, nothing surfaces to the user
                Err(err) => tracing::error!("route load error for {}: {err:#}", nav.url),
            }
        });
    }

    fn submit(&mut self, target: Option<&str>) {
        let (outcome, result) = submit::handle_submit(&mut self.shell, target, &self.toasts);

        if let SubmitOutcome::Accepted { banner_generation } = outcome {
            match serde_json::to_string_pretty(&result.data) {
                Ok(record) => println!("{record}"),
                Err(err) => tracing::error!("could not render accepted record: {err}"),
            }
            // Auto-hide the success region after its fixed lifetime; the
            // generation keeps a slow timer from hiding a newer banner
            if let Some(generation) = banner_generation {
                let events_tx = self.events_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(submit::SUCCESS_REGION_TTL).await;
                    let _ = events_tx.send(UiEvent::SuccessExpired { generation }).await;
                });
            }
        }
    }

    /// State dump for the driver's `show` command
    fn describe(&self) -> String {
        let mut out = format!("hash: {}\n{}", self.hash, self.shell.describe());
        let toasts = self.toasts.recent();
        if !toasts.is_empty() {
            out.push_str("toasts:\n");
            for toast in toasts.iter().rev().take(5) {
                out.push_str(&format!(
                    "  [{}] {} ({}ms)\n",
                    toast.at.format("%H:%M:%S"),
                    toast.message,
                    toast.timeout.as_millis()
                ));
            }
        }
        out
    }

    #[cfg(test)]
    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    #[cfg(test)]
    pub fn current_hash(&self) -> &str {
        &self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    /// Serves synthetic fragments keyed by file name. With `fail` set,
    /// every fetch errors the way a 404 or a dead server would.
    #[derive(Default)]
    struct StubFetcher {
        fail: std::sync::atomic::AtomicBool,
    }

    impl FragmentFetcher for StubFetcher {
        async fn fetch(&self, url: String) -> Result<String> {
            if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
                bail!("fragment {url} returned 404 Not Found");
            }
            let page = |title: &str, body: &str| {
                format!(
                    "<html><head><title>{title}</title></head><body><main>{body}</main></body></html>"
                )
            };
            if url.ends_with("/index.html") {
                Ok(page("Início", "<h1>Bem-vindo</h1>"))
            } else if url.ends_with("/projeto.html") {
                Ok(page("Projeto", "<h1>O projeto</h1>"))
            } else if url.ends_with("/cadastro.html") {
                let controls: String = [
                    "nome",
                    "email",
                    "cpf",
                    "telefone",
                    "nascimento",
                    "endereco",
                    "cep",
                    "cidade",
                    "estado",
                ]
                .iter()
                .map(|id| format!(r#"<input id="{id}" name="{id}" value="">"#))
                .collect();
                Ok(page(
                    "Cadastro",
                    &format!(
                        r#"<form id="volunteerform">{controls}</form><div id="sucessmessage" hidden></div>"#
                    ),
                ))
            } else {
                bail!("404 for {url}")
            }
        }
    }

    fn engine_with_channel() -> (Engine<StubFetcher>, mpsc::Receiver<UiEvent>, Arc<StubFetcher>) {
        let (tx, rx) = mpsc::channel(16);
        let fetcher = Arc::new(StubFetcher::default());
        let engine = Engine::new(
            "http://localhost:8000",
            fetcher.clone(),
            ToastRack::new(),
            tx,
        );
        (engine, rx, fetcher)
    }

    async fn recv_loaded(rx: &mut mpsc::Receiver<UiEvent>) -> (u64, crate::fragment::Fragment) {
        match rx.recv().await.expect("a completion") {
            UiEvent::FragmentLoaded { seq, fragment } => (seq, fragment),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_navigation_loads_and_swaps() {
        let (mut engine, mut rx, _fetcher) = engine_with_channel();
        engine.boot("#/projeto");
        let (seq, fragment) = recv_loaded(&mut rx).await;
        assert!(engine.handle_event(UiEvent::FragmentLoaded { seq, fragment }));
        assert_eq!(engine.shell().title, "Projeto");
        assert_eq!(engine.current_hash(), "#/projeto");
    }

    #[tokio::test]
    async fn test_stale_fragment_never_overwrites_newer_one() {
        let (mut engine, mut rx, _fetcher) = engine_with_channel();
        engine.handle_event(UiEvent::HashChanged {
            hash: "#/projeto".into(),
        });
        engine.handle_event(UiEvent::HashChanged {
            hash: "#/cadastro".into(),
        });

        // Collect both completions, then deliver them newest-first to
        // simulate the out-of-order finish
        let mut loads = vec![recv_loaded(&mut rx).await, recv_loaded(&mut rx).await];
        loads.sort_by_key(|(seq, _)| std::cmp::Reverse(*seq));
        for (seq, fragment) in loads {
            engine.handle_event(UiEvent::FragmentLoaded { seq, fragment });
        }
        assert_eq!(engine.shell().title, "Cadastro");
    }

    #[tokio::test]
    async fn test_failed_load_leaves_previous_page() {
        let (mut engine, mut rx, fetcher) = engine_with_channel();
        engine.handle_event(UiEvent::HashChanged { hash: "#/".into() });
        let (seq, fragment) = recv_loaded(&mut rx).await;
        engine.handle_event(UiEvent::FragmentLoaded { seq, fragment });
        assert_eq!(engine.shell().title, "Início");

        // The next load fails; no completion arrives and the shell keeps
        // showing the previous page
        fetcher.fail.store(true, std::sync::atomic::Ordering::SeqCst);
        engine.handle_event(UiEvent::HashChanged {
            hash: "#/projeto".into(),
        });
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(engine.shell().title, "Início");
    }

    #[tokio::test]
    async fn test_legacy_click_converges_with_hash_path() {
        let (mut engine, mut rx, _fetcher) = engine_with_channel();
        engine.handle_event(UiEvent::LinkClicked {
            href: "./cadastro.html".into(),
        });
        assert_eq!(engine.current_hash(), "#/cadastro");
        let (seq, fragment) = recv_loaded(&mut rx).await;
        engine.handle_event(UiEvent::FragmentLoaded { seq, fragment });
        assert_eq!(engine.shell().title, "Cadastro");
    }

    #[tokio::test]
    async fn test_non_legacy_click_is_ignored() {
        let (mut engine, _rx, _fetcher) = engine_with_channel();
        engine.handle_event(UiEvent::LinkClicked {
            href: "https://exemplo.org".into(),
        });
        assert_eq!(engine.current_hash(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_accepted_submission_banner_auto_hides() {
        let (mut engine, mut rx, _fetcher) = engine_with_channel();
        engine.handle_event(UiEvent::HashChanged {
            hash: "#/cadastro".into(),
        });
        let (seq, fragment) = recv_loaded(&mut rx).await;
        engine.handle_event(UiEvent::FragmentLoaded { seq, fragment });

        for (id, value) in [
            ("nome", "Ana Souza"),
            ("email", "ana@exemplo.com"),
            ("cpf", "123.456.789-00"),
            ("telefone", "(81) 99999-0000"),
            ("nascimento", "1990-03-14"),
            ("endereco", "Rua das Flores, 12"),
            ("cep", "50000-000"),
            ("cidade", "Recife"),
            ("estado", "PE"),
        ] {
            engine.handle_event(UiEvent::FieldEdited {
                element_id: id.into(),
                value: value.into(),
            });
        }
        engine.handle_event(UiEvent::SubmitRequested { target: None });
        assert!(engine.shell().success_visible());

        // The paused clock advances once the runtime goes idle, so the
        // auto-hide timer fires without a real 3.5 s wait
        match rx.recv().await.expect("the auto-hide event") {
            UiEvent::SuccessExpired { generation } => {
                engine.handle_event(UiEvent::SuccessExpired { generation });
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(!engine.shell().success_visible());
    }

    #[tokio::test]
    async fn test_boot_without_hash_claims_root_without_loading() {
        let (mut engine, mut rx, _fetcher) = engine_with_channel();
        engine.boot("");
        assert_eq!(engine.current_hash(), ROOT_HASH);
        // No load was started
        assert!(rx.try_recv().is_err());
    }
}
