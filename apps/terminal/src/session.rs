//! # Sale Session
//!
//! One sale screen: the ledger, its summary panel, the barcode box, the
//! search modal and the alert stack, driven by text commands.
//!
//! ## Command Routing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Commands                                 │
//! │                                                                         │
//! │  Input line              Component           Ledger effect              │
//! │  ──────────              ─────────           ─────────────              │
//! │                                                                         │
//! │  7840001 / codigo C ───► CodeScanner.scan ──► add_or_increment         │
//! │  sugerir T ────────────► CodeScanner.suggestions                        │
//! │  ver C ────────────────► CodeScanner.preview                            │
//! │  buscar T ─────────────► SearchModal.search                             │
//! │  agregar ID ───────────► SearchModal.select ► add_or_increment         │
//! │  cantidad ID N ────────────────────────────► set_quantity              │
//! │  quitar ID ────────────────────────────────► remove                    │
//! │  registrar ────────────────────────────────► submission_json + clear   │
//! │                                                                         │
//! │  Every ledger change reaches the SummaryPanel through LedgerListener.  │
//! │  Errors become UserMessages and are shown as error alerts.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use caja_catalog::{CodeScanner, ModalState, Preview, ProductCatalog, SearchModal};
use caja_core::form::{FieldState, FormValidator, FormValues, Rule};
use caja_core::validation::parse_quantity_input;
use caja_core::{AddOutcome, Ledger, Product, ProductId, ProductSelected};
use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

use crate::alerts::{AlertKind, Alerts};
use crate::config::PosConfig;
use crate::error::UserMessage;
use crate::panel::SummaryPanel;
use crate::table;

const HELP: &str = "\
Comandos:
  <código>                 escanear un código de barras
  codigo <código>          escanear un código de barras
  sugerir <texto>          sugerencias de códigos
  ver <código>             vista previa del producto
  buscar [texto]           buscar productos por nombre
  agregar <id>             agregar un producto del buscador
  cerrar                   cerrar el buscador
  cantidad <id> <n>        cambiar la cantidad de una línea
  quitar <id>              eliminar una línea
  vaciar                   vaciar la venta
  tabla                    mostrar la tabla de venta
  resumen                  mostrar el resumen
  registrar                registrar la venta
  avisos                   listar avisos activos
  descartar <n>            cerrar un aviso
  ayuda                    esta ayuda
  salir                    terminar";

const QUANTITY_FIELD: &str = "cantidad";

// =============================================================================
// Commands
// =============================================================================

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan(String),
    Suggest(String),
    Preview(String),
    OpenModal,
    Search(String),
    AddFromModal(ProductId),
    CloseModal,
    SetQuantity { id: ProductId, raw: String },
    Remove(ProductId),
    Clear,
    Table,
    Summary,
    Submit,
    Alerts,
    Dismiss(u64),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = UserMessage;

    /// Lines that start with no known keyword are scanned as barcodes, the
    /// way a scanner types a code followed by Enter.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        let command = match keyword.to_lowercase().as_str() {
            "codigo" | "código" | "c" => Command::Scan(rest.to_string()),
            "sugerir" | "s" => Command::Suggest(rest.to_string()),
            "ver" | "v" => Command::Preview(rest.to_string()),
            "buscar" | "b" if rest.is_empty() => Command::OpenModal,
            "buscar" | "b" => Command::Search(rest.to_string()),
            "agregar" | "a" => Command::AddFromModal(product_id(required(rest, "agregar <id>")?)),
            "cerrar" => Command::CloseModal,
            "cantidad" | "n" => {
                let (id, raw) = required(rest, "cantidad <id> <n>")?
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| UserMessage::usage("Uso: cantidad <id> <n>"))?;
                Command::SetQuantity {
                    id: product_id(id),
                    raw: raw.trim().to_string(),
                }
            }
            "quitar" | "x" => Command::Remove(product_id(required(rest, "quitar <id>")?)),
            "vaciar" => Command::Clear,
            "tabla" | "t" => Command::Table,
            "resumen" | "r" => Command::Summary,
            "registrar" => Command::Submit,
            "avisos" => Command::Alerts,
            "descartar" => Command::Dismiss(
                required(rest, "descartar <n>")?
                    .parse()
                    .map_err(|_| UserMessage::usage("Uso: descartar <n>"))?,
            ),
            "ayuda" | "?" | "help" => Command::Help,
            "salir" | "exit" | "quit" => Command::Quit,
            _ => Command::Scan(line.to_string()),
        };

        Ok(command)
    }
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, UserMessage> {
    if rest.is_empty() {
        Err(UserMessage::usage(format!("Uso: {}", usage)))
    } else {
        Ok(rest)
    }
}

fn is_whole_number(value: &str) -> bool {
    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Rules for the quantity input. A failing value still goes to the ledger,
/// which reads its leading integer and clamps it.
fn quantity_form() -> FormValidator {
    FormValidator::new().rule(
        QUANTITY_FIELD,
        vec![
            Rule::Required,
            Rule::Pattern {
                check: is_whole_number,
                message: "Ingrese un número entero".to_string(),
            },
        ],
    )
}

fn product_id(raw: &str) -> ProductId {
    match raw.trim().parse() {
        Ok(id) => id,
        Err(never) => match never {},
    }
}

// =============================================================================
// Session
// =============================================================================

/// What the loop should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// State of one sale screen.
pub struct Session {
    ledger: Ledger,
    panel: Arc<SummaryPanel>,
    scanner: CodeScanner,
    modal: SearchModal,
    alerts: Alerts,
    quantity_form: FormValidator,
    last_submission: Option<String>,
}

impl Session {
    pub fn new(catalog: Arc<dyn ProductCatalog>, config: &PosConfig) -> Self {
        let panel = Arc::new(SummaryPanel::new(config.display.show_words));
        let mut ledger = Ledger::new();
        ledger.subscribe(panel.clone());

        let debounce = config.catalog.debounce();
        Session {
            ledger,
            panel,
            scanner: CodeScanner::new(Arc::clone(&catalog), debounce),
            modal: SearchModal::new(catalog, debounce),
            alerts: Alerts::new(config.display.alert_secs),
            quantity_form: quantity_form(),
            last_submission: None,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn panel(&self) -> &SummaryPanel {
        &self.panel
    }

    pub fn modal(&self) -> &SearchModal {
        &self.modal
    }

    /// Value of the hidden `productos` field of the last registered sale.
    pub fn last_submission(&self) -> Option<&str> {
        self.last_submission.as_deref()
    }

    /// Parses and runs one input line, then appends any new alerts.
    pub async fn handle_line(&mut self, line: &str) -> Reply {
        let result = match line.parse::<Command>() {
            Ok(Command::Quit) => return Reply::Quit,
            Ok(command) => self.execute(command).await,
            Err(usage) => Err(usage),
        };

        let mut output = match result {
            Ok(text) => text,
            Err(message) => {
                debug!(code = ?message.code, message = %message, "Command failed");
                self.alerts.push(AlertKind::Error, message.message);
                String::new()
            }
        };

        let fresh = self.alerts.take_new();
        if !fresh.is_empty() {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(&Alerts::render(&fresh));
        }

        Reply::Output(output)
    }

    /// Runs a command and returns the text to show.
    pub async fn execute(&mut self, command: Command) -> Result<String, UserMessage> {
        match command {
            Command::Scan(code) => {
                let selected = self.scanner.scan(&code).await?;
                self.accept(selected)
            }
            Command::Suggest(text) => Ok(self.suggest(&text).await),
            Command::Preview(code) => Ok(self.preview(&code).await),
            Command::OpenModal => {
                self.modal.open();
                Ok(render_modal(&self.modal.state()))
            }
            Command::Search(text) => {
                if !self.modal.is_open() {
                    self.modal.open();
                }
                Ok(self
                    .modal
                    .search(&text)
                    .await
                    .map(|state| render_modal(&state))
                    .unwrap_or_default())
            }
            Command::AddFromModal(id) => {
                if !self.modal.is_open() {
                    return Err(UserMessage::usage(
                        "El buscador está cerrado. Use 'buscar <texto>'.",
                    ));
                }
                let selected = self.modal.select(&id).await?;
                self.accept(selected)
            }
            Command::CloseModal => {
                self.modal.close();
                Ok(String::new())
            }
            Command::SetQuantity { id, raw } => self.set_quantity(&id, &raw),
            Command::Remove(id) => {
                let removed = self.ledger.remove(&id);
                match removed {
                    Some(line) => {
                        info!(id = %id, "Line removed");
                        Ok(format!("Eliminado: {}\n{}", line.name, self.panel.render()))
                    }
                    None => Ok(self.panel.render()),
                }
            }
            Command::Clear => {
                self.ledger.clear();
                Ok(self.panel.render())
            }
            Command::Table => Ok(table::render(self.ledger.lines())),
            Command::Summary => Ok(self.panel.render()),
            Command::Submit => self.submit(),
            Command::Alerts => {
                let active = self.alerts.active();
                if active.is_empty() {
                    return Ok("Sin avisos.".to_string());
                }
                Ok(active
                    .iter()
                    .map(|a| format!("[{}] {} {}", a.id, a.kind.icon(), a.message))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Command::Dismiss(id) => {
                self.alerts.dismiss(id);
                Ok(String::new())
            }
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }

    /// Hands a selection to the ledger.
    fn accept(&mut self, selected: ProductSelected) -> Result<String, UserMessage> {
        let product = selected.product;
        let outcome = self.ledger.add_or_increment(&product).map_err(|e| {
            info!(id = %product.id, error = %e, "Product rejected by ledger");
            UserMessage::from(e)
        })?;

        let line = match outcome {
            AddOutcome::Inserted => {
                info!(id = %product.id, name = %product.name, "Line added");
                format!("Agregado: {} {}", product.name, product.unit_price)
            }
            AddOutcome::Incremented { quantity } => {
                debug!(id = %product.id, quantity, "Line incremented");
                format!("{}: cantidad {}", product.name, quantity)
            }
        };

        Ok(format!("{}\n{}", line, self.panel.render()))
    }

    fn set_quantity(&mut self, id: &ProductId, raw: &str) -> Result<String, UserMessage> {
        let requested = parse_quantity_input(raw);
        let change = self.ledger.set_quantity(id, requested)?;

        let Some(line) = self.ledger.get(id) else {
            return Ok(self.panel.render());
        };

        let values = FormValues::from([(QUANTITY_FIELD.to_string(), raw.to_string())]);
        if let FieldState::Invalid(message) = self
            .quantity_form
            .validate_field(QUANTITY_FIELD, &values)
            .state
        {
            self.alerts.push(AlertKind::Warning, message);
        }

        if change.clamped && requested > change.quantity {
            self.alerts.push(
                AlertKind::Warning,
                format!("Stock máximo: {}", line.stock_available),
            );
        }

        debug!(id = %id, requested, quantity = change.quantity, "Quantity set");
        Ok(format!(
            "{}: cantidad {} (subtotal {})\n{}",
            line.name,
            change.quantity,
            line.subtotal(),
            self.panel.render()
        ))
    }

    fn submit(&mut self) -> Result<String, UserMessage> {
        let payload = self.ledger.submission_json()?;
        let summary = self.ledger.snapshot();

        info!(
            lines = self.ledger.len(),
            items = summary.item_count,
            total = summary.total.units(),
            "Sale registered"
        );

        self.ledger.clear();
        self.alerts.push(
            AlertKind::Success,
            format!("Venta registrada por {}.", summary.total),
        );
        self.last_submission = Some(payload.clone());
        Ok(format!("productos={}", payload))
    }

    async fn suggest(&self, text: &str) -> String {
        match self.scanner.suggestions(text).await {
            Some(list) if list.is_empty() => "Sin sugerencias.".to_string(),
            Some(list) => list
                .iter()
                .map(|s| format!("{:<14} {}", s.barcode, s.name))
                .collect::<Vec<_>>()
                .join("\n"),
            None => String::new(),
        }
    }

    async fn preview(&self, code: &str) -> String {
        match self.scanner.preview(code).await {
            Some(Preview::Shown(product)) => render_preview(&product),
            Some(Preview::Hidden) => "Sin vista previa.".to_string(),
            None => String::new(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("ledger", &self.ledger)
            .field("modal", &self.modal)
            .finish()
    }
}

// =============================================================================
// Rendering
// =============================================================================

fn units_label(stock: i64) -> String {
    if stock == 1 {
        "1 unidad".to_string()
    } else {
        format!("{} unidades", stock)
    }
}

fn render_preview(product: &Product) -> String {
    format!(
        "{}\n  Precio: {}\n  Stock: {}\n  Categoría: {}",
        product.name,
        product.unit_price,
        units_label(product.stock_available),
        product.category
    )
}

fn render_modal(state: &ModalState) -> String {
    match state {
        ModalState::Initial => "Escriba al menos 2 caracteres para buscar.".to_string(),
        ModalState::Loading => "Buscando...".to_string(),
        ModalState::Results(rows) => {
            let mut out = String::new();
            for p in rows {
                let action = if p.in_stock() {
                    format!("agregar {}", p.id)
                } else {
                    "Sin stock".to_string()
                };
                let _ = writeln!(
                    out,
                    "{:<6} {:<24} {:<14} {:<12} {:>10} {:>12}  {}",
                    p.id,
                    p.name,
                    p.barcode,
                    p.category,
                    p.unit_price,
                    units_label(p.stock_available),
                    action
                );
            }
            out.pop();
            out
        }
        ModalState::NoResults | ModalState::Failed => {
            state.message().unwrap_or_default().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caja_catalog::InMemoryCatalog;

    fn session() -> (Session, Arc<InMemoryCatalog>) {
        let catalog = Arc::new(InMemoryCatalog::demo());
        let session = Session::new(catalog.clone(), &PosConfig::default());
        (session, catalog)
    }

    fn output(reply: Reply) -> String {
        match reply {
            Reply::Output(text) => text,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(
            "7840001".parse::<Command>().unwrap(),
            Command::Scan("7840001".into())
        );
        assert_eq!(
            "codigo 7840001".parse::<Command>().unwrap(),
            Command::Scan("7840001".into())
        );
        assert_eq!("".parse::<Command>().unwrap(), Command::Scan(String::new()));
        assert_eq!("buscar".parse::<Command>().unwrap(), Command::OpenModal);
        assert_eq!(
            "buscar pan felipe".parse::<Command>().unwrap(),
            Command::Search("pan felipe".into())
        );
        assert_eq!(
            "cantidad 5 3".parse::<Command>().unwrap(),
            Command::SetQuantity {
                id: ProductId::from(5),
                raw: "3".into()
            }
        );
        assert_eq!(
            "quitar sku-9".parse::<Command>().unwrap(),
            Command::Remove(ProductId::from("sku-9"))
        );
        assert_eq!("SALIR".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn test_command_usage_errors() {
        let err = "cantidad 5".parse::<Command>().unwrap_err();
        assert_eq!(err.message, "Uso: cantidad <id> <n>");

        let err = "agregar".parse::<Command>().unwrap_err();
        assert_eq!(err.message, "Uso: agregar <id>");

        assert!("descartar uno".parse::<Command>().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_until_stock_runs_out() {
        let (mut session, _) = session();

        for _ in 0..3 {
            session.handle_line("7840005").await;
        }
        let text = output(session.handle_line("7840005").await);
        assert!(text.contains("✗ No hay suficiente stock para 'Leche entera 1L'. Disponible: 3"));

        let line = session.ledger().get(&ProductId::from(5)).unwrap();
        assert_eq!(line.quantity, 3);

        let view = session.panel().view();
        assert_eq!(view.total, "₲22.500");
        assert_eq!(view.total_words, "veinte y dos mil quinientos guaraníes");
        assert_eq!(view.item_count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_messages() {
        let (mut session, catalog) = session();

        let text = output(session.handle_line("").await);
        assert_eq!(text, "✗ Por favor, ingrese un código de barras.");

        let text = output(session.handle_line("7840007").await);
        assert_eq!(text, "✗ 'Chipa (docena)' no tiene stock disponible.");

        catalog.set_offline(true);
        let text = output(session.handle_line("7840001").await);
        assert_eq!(text, "✗ Error al conectar con el servidor.");
        assert!(session.ledger().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_quantity_clamping_and_warning() {
        let (mut session, _) = session();
        session.handle_line("7840006").await;

        let text = output(session.handle_line("cantidad 6 9").await);
        assert!(text.contains("cantidad 5"));
        assert!(text.contains("⚠ Stock máximo: 5"));

        let text = output(session.handle_line("cantidad 6 abc").await);
        assert!(text.contains("cantidad 1"));
        assert!(text.contains("⚠ Ingrese un número entero"));
        assert!(!text.contains("Stock máximo"));

        let text = output(session.handle_line("cantidad 6 3abc").await);
        assert!(text.contains("cantidad 3"));
        assert!(text.contains("⚠ Ingrese un número entero"));

        let text = output(session.handle_line("cantidad 6 2").await);
        assert!(text.contains("cantidad 2"));
        assert!(!text.contains("⚠"));

        let text = output(session.handle_line("cantidad 99 2").await);
        assert!(text.contains("✗ El producto 99 no está en la venta."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_gate_and_payload() {
        let (mut session, _) = session();

        let text = output(session.handle_line("registrar").await);
        assert_eq!(text, "✗ Debe agregar al menos un producto a la venta.");

        session.handle_line("7840005").await;
        session.handle_line("7840005").await;
        session.handle_line("7840002").await;

        let text = output(session.handle_line("registrar").await);
        assert!(text.starts_with(r#"productos=[{"id":5,"cantidad":2},{"id":2,"cantidad":1}]"#));
        assert!(text.contains("✓ Venta registrada por ₲27.000."));
        assert_eq!(
            session.last_submission(),
            Some(r#"[{"id":5,"cantidad":2},{"id":2,"cantidad":1}]"#)
        );
        assert!(session.ledger().is_empty());
        assert!(!session.panel().view().submit_enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_modal_flow() {
        let (mut session, _) = session();

        let text = output(session.handle_line("buscar").await);
        assert_eq!(text, "Escriba al menos 2 caracteres para buscar.");
        assert!(session.modal().is_open());

        let text = output(session.handle_line("buscar queso").await);
        assert!(text.contains("Queso Paraguay 1kg"));
        assert!(text.contains("agregar 6"));

        let text = output(session.handle_line("agregar 6").await);
        assert!(text.starts_with("Agregado: Queso Paraguay 1kg ₲45.000"));
        assert!(!session.modal().is_open());

        let text = output(session.handle_line("agregar 6").await);
        assert!(text.contains("El buscador está cerrado."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_modal_lists_out_of_stock_rows() {
        let (mut session, _) = session();
        let text = output(session.handle_line("buscar chipa").await);
        assert!(text.contains("0 unidades"));
        assert!(text.contains("Sin stock"));

        let text = output(session.handle_line("buscar zzz").await);
        assert_eq!(
            text,
            "No se encontraron productos que coincidan con la búsqueda."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggest_and_preview() {
        let (mut session, _) = session();

        let text = output(session.handle_line("sugerir 7840008").await);
        assert!(text.contains("Pan felipe"));

        let text = output(session.handle_line("sugerir").await);
        assert_eq!(text, "Sin sugerencias.");

        let text = output(session.handle_line("ver 7840003").await);
        assert!(text.starts_with("Yerba mate 500g"));
        assert!(text.contains("Stock: 30 unidades"));

        let text = output(session.handle_line("ver 000").await);
        assert_eq!(text, "Sin vista previa.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_and_clear() {
        let (mut session, _) = session();
        session.handle_line("7840001").await;
        session.handle_line("7840002").await;

        let text = output(session.handle_line("quitar 1").await);
        assert!(text.starts_with("Eliminado: Agua mineral 500ml"));
        assert_eq!(session.ledger().len(), 1);

        session.handle_line("quitar 1").await;
        assert_eq!(session.ledger().len(), 1);

        session.handle_line("vaciar").await;
        assert!(session.ledger().is_empty());
        assert_eq!(session.panel().view().total, "₲0");
    }

    #[tokio::test(start_paused = true)]
    async fn test_alerts_listing_and_dismiss() {
        let (mut session, _) = session();
        session.handle_line("7840006").await;
        session.handle_line("cantidad 6 50").await;

        let text = output(session.handle_line("avisos").await);
        assert_eq!(text, "[1] ⚠ Stock máximo: 5");

        session.handle_line("descartar 1").await;
        let text = output(session.handle_line("avisos").await);
        assert_eq!(text, "Sin avisos.");
    }

    #[tokio::test]
    async fn test_quit() {
        let (mut session, _) = session();
        assert_eq!(session.handle_line("salir").await, Reply::Quit);
    }
}
