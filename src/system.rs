use std::sync::{atomic::Ordering, Arc};

use bevy_ecs::{
    prelude::*,
    system::{CommandQueue, InsertResource},
};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use tokio::sync::mpsc;

use crate::{
    api::MarketDataSource,
    app::{AppState, HELP_VISIBLE, RT},
    data::{
        view_model::{build_index_view, build_stock_view},
        IndexView, StockRow,
    },
    export::{self, ClipboardSink},
    helper::date,
    kline::{self, KlineChart},
    refresh::Refresher,
    render::{IndexPanel, StockTable},
    widgets::Terminal,
};

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
}

#[derive(Clone, Resource)]
pub struct Command(pub mpsc::UnboundedSender<CommandQueue>);

/// Long lived handles shared by every refresh and export
#[derive(Clone, Resource)]
pub struct Services {
    pub source: Arc<MarketDataSource>,
    pub refresher: Refresher,
    pub sink: Arc<dyn ClipboardSink>,
}

#[derive(Debug, Default, Resource)]
pub struct Status {
    /// Clock time of the last applied refresh
    pub last_refresh: Option<String>,
    pub busy: bool,
    /// Outcome of the last export
    pub message: Option<String>,
}

#[derive(Debug, Default, Resource)]
pub struct ChartView {
    pub code: String,
    pub name: String,
    pub chart: Option<KlineChart>,
    pub loading: bool,
}

impl ChartView {
    fn loading(row: &StockRow) -> Self {
        Self {
            code: row.code().to_string(),
            name: row.name().to_string(),
            chart: None,
            loading: true,
        }
    }
}

/// Result of one refresh cycle, applied on the main loop
struct ApplyRefresh {
    index: IndexView,
    stocks: Vec<StockRow>,
    at: String,
}

impl bevy_ecs::system::Command for ApplyRefresh {
    fn apply(self, world: &mut World) {
        world.resource_mut::<IndexPanel>().apply_index(&self.index);
        world.resource_mut::<StockTable>().apply_stock(self.stocks);
        let mut status = world.resource_mut::<Status>();
        status.last_refresh = Some(self.at);
        status.busy = false;
    }
}

struct MarkBusy;

impl bevy_ecs::system::Command for MarkBusy {
    fn apply(self, world: &mut World) {
        world.resource_mut::<Status>().busy = true;
    }
}

/// Loaded candles for `code`; dropped when the view moved on to another code
struct ApplyChart {
    code: String,
    chart: Option<KlineChart>,
}

impl bevy_ecs::system::Command for ApplyChart {
    fn apply(self, world: &mut World) {
        let mut view = world.resource_mut::<ChartView>();
        if view.code != self.code || !view.loading {
            tracing::debug!(code = %self.code, "丢弃过期的 K 线结果");
            return;
        }
        view.chart = self.chart;
        view.loading = false;
    }
}

fn send(command: &Command, queue: CommandQueue) {
    if command.0.send(queue).is_err() {
        tracing::debug!("更新通道已关闭");
    }
}

/// Fetch every feed, build both views and hand them to the main loop
pub async fn refresh_cycle(source: &MarketDataSource, command: &Command) {
    let mut queue = CommandQueue::default();
    queue.push(MarkBusy);
    send(command, queue);

    let snapshots = source.fetch_all().await;
    let index = build_index_view(
        snapshots.index.as_ref(),
        snapshots.north_sh.as_ref(),
        snapshots.north_sz.as_ref(),
    );
    let stocks = build_stock_view(snapshots.stocks.as_ref());
    tracing::info!(
        index_cells = index.len(),
        stocks = stocks.len(),
        "刷新完成"
    );

    let mut queue = CommandQueue::default();
    queue.push(ApplyRefresh {
        index,
        stocks,
        at: date::clock(date::now_local()),
    });
    send(command, queue);
}

/// Ask for a refresh; requests made while one runs collapse into a single follow-up
pub fn request_refresh(services: &Services, command: &Command) {
    let Some(rt) = RT.get() else {
        tracing::error!("运行时未就绪，刷新已丢弃");
        return;
    };
    if services.refresher.is_busy() {
        tracing::debug!("刷新进行中，请求已排队");
    }
    let services = services.clone();
    let command = command.clone();
    rt.spawn(async move {
        let source = &services.source;
        let command = &command;
        services
            .refresher
            .request(move || refresh_cycle(source, command))
            .await;
    });
}

/// Export the stock table and report the outcome in the footer
pub fn copy_table(world: &mut World) {
    let sink = world.resource::<Services>().sink.clone();
    let table = world.resource::<StockTable>();
    let rows = table.len();
    let message = match export::copy_table(table, &*sink) {
        Ok(target) => {
            tracing::info!(rows, target = %target, "个股表格已复制");
            t!("Status.copied", rows = &rows.to_string(), target = &target)
        }
        Err(err) => {
            tracing::warn!("复制个股表格失败：{err:#}");
            t!("Status.copy_failed")
        }
    };
    world.resource_mut::<Status>().message = Some(message);
}

fn open_chart(row: &StockRow, services: &Services, command: &Command) {
    let mut queue = CommandQueue::default();
    queue.push(InsertResource {
        resource: ChartView::loading(row),
    });
    queue.push(InsertResource {
        resource: NextState(Some(AppState::Chart)),
    });
    send(command, queue);

    let Some(rt) = RT.get() else {
        return;
    };
    let code = row.code().to_string();
    let provider = services.source.provider().clone();
    let command = command.clone();
    rt.spawn(async move {
        let (start, end) = kline::chart_range(date::now_local());
        let chart = kline::fetch_chart(provider.as_ref(), &code, &start, &end).await;
        let mut queue = CommandQueue::default();
        queue.push(ApplyChart { code, chart });
        send(&command, queue);
    });
}

pub fn exit_chart(mut view: ResMut<ChartView>) {
    *view = ChartView::default();
}

/// Navbar on top, footer at the bottom, the rest for `body`
fn frame_layout(rect: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(rect);
    (chunks[0], chunks[1], chunks[2])
}

pub fn render_panel(
    mut terminal: ResMut<Terminal>,
    mut events: EventReader<Key>,
    command: Res<Command>,
    services: Res<Services>,
    panel: Res<IndexPanel>,
    mut table: ResMut<StockTable>,
    status: Res<Status>,
) {
    for event in &mut events {
        match event {
            Key::Up => table.select_prev(),
            Key::Down => table.select_next(),
            Key::Enter => {
                if let Some(row) = table.selected() {
                    open_chart(row, &services, &command);
                }
            }
        }
    }

    _ = terminal.draw(|frame| {
        let (top, body, bottom) = frame_layout(frame.size());
        crate::views::navbar::render(frame, top, AppState::Panel);
        crate::views::footer::render(frame, bottom, &status);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(crate::views::index_panel::height(&panel)),
                Constraint::Min(0),
            ])
            .split(body);
        crate::views::index_panel::render(frame, chunks[0], &panel);
        crate::views::stock_table::render(frame, chunks[1], &mut table);

        if HELP_VISIBLE.load(Ordering::Relaxed) {
            crate::views::help::render(frame, body);
        }
    });
}

pub fn render_chart(
    mut terminal: ResMut<Terminal>,
    view: Res<ChartView>,
    status: Res<Status>,
) {
    _ = terminal.draw(|frame| {
        let (top, body, bottom) = frame_layout(frame.size());
        crate::views::navbar::render(frame, top, AppState::Chart);
        crate::views::footer::render(frame, bottom, &status);
        crate::views::chart::render(frame, body, &view);

        if HELP_VISIBLE.load(Ordering::Relaxed) {
            crate::views::help::render(frame, body);
        }
    });
}
