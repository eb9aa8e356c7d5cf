use std::sync::{atomic::Ordering, Arc, OnceLock};
use std::time::Duration;

use atomic::Atomic;
use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_ecs::system::{CommandQueue, SystemState};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::{
    api::MarketDataSource,
    config::{self, Config},
    export::FileSink,
    provider::{EastmoneyProvider, Provider},
    refresh::Refresher,
    render::{DirtyFlags, IndexPanel, RenderState, StockTable},
    system::{self, ChartView, Services, Status},
    ui::styles,
    widgets::Terminal,
};

pub static RT: OnceLock<tokio::runtime::Handle> = OnceLock::new();
pub static HELP_VISIBLE: Atomic<bool> = Atomic::new(false);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, States)]
pub enum AppState {
    #[default]
    Panel,
    Chart,
}

#[allow(clippy::too_many_lines)]
pub async fn run(config: Config) -> anyhow::Result<()> {
    let (update_tx, mut update_rx) = mpsc::unbounded_channel::<CommandQueue>();

    styles::set_color_mode(config.color_mode);
    let watchlist = config.watchlist();
    tracing::info!(
        indexes = watchlist.index_list().len(),
        stocks = watchlist.stock_list().len(),
        refresh_secs = config.refresh_secs,
        "面板启动"
    );

    let provider: Arc<dyn Provider> = Arc::new(EastmoneyProvider::new()?);
    let services = Services {
        source: Arc::new(MarketDataSource::new(provider, watchlist.clone())),
        refresher: Refresher::default(),
        sink: Arc::new(FileSink::new(config::export_path())),
    };
    let command = system::Command(update_tx);

    _ = RT.set(tokio::runtime::Handle::current());
    let mut app = bevy_app::App::new();
    app.add_state::<AppState>()
        .add_event::<system::Key>()
        .insert_resource(Terminal::new()?)
        .insert_resource(IndexPanel::new(&watchlist))
        .init_resource::<StockTable>()
        .init_resource::<ChartView>()
        .init_resource::<Status>()
        .insert_resource(services.clone())
        .insert_resource(command.clone())
        .add_systems(Update, system::render_panel.run_if(in_state(AppState::Panel)))
        .add_systems(Update, system::render_chart.run_if(in_state(AppState::Chart)))
        .add_systems(OnExit(AppState::Chart), system::exit_chart);

    system::request_refresh(&services, &command);

    let mut auto_refresh = config.refresh_interval().map(|period| {
        let mut tick = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        tick
    });

    // ~30 FPS, idle frames are skipped
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut clock_tick = tokio::time::interval(Duration::from_secs(1));
    clock_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut events = crossterm::event::EventStream::new();
    let mut render_state = RenderState::new();

    loop {
        tokio::select! {
            _ = render_tick.tick() => {
                if render_state.needs_render() {
                    app.update();
                    render_state.clear();
                } else {
                    render_state.skip();
                }
            }
            _ = clock_tick.tick() => {
                render_state.mark_dirty(DirtyFlags::NAVBAR);
            }
            () = next_auto_refresh(auto_refresh.as_mut()) => {
                tracing::debug!("定时刷新");
                system::request_refresh(&services, &command);
            }
            Some(mut cmd) = update_rx.recv() => {
                cmd.apply(&mut app.world);
                render_state.mark_dirty(DirtyFlags::ALL);
            }
            Some(event) = tokio_stream::StreamExt::next(&mut events) => {
                let event = match event {
                    Ok(crossterm::event::Event::Key(event)) => event,
                    Ok(crossterm::event::Event::Resize(..)) => {
                        render_state.mark_all_dirty();
                        continue;
                    }
                    Ok(_) => continue,
                    Err(err) => {
                        tracing::error!("接收终端事件失败：{err}");
                        break;
                    }
                };

                if !handle_key(&mut app, event, &services, &command, &mut render_state) {
                    break;
                }
            }
        }
    }

    tracing::info!("{}", render_state.stats());
    Ok(())
}

async fn next_auto_refresh(tick: Option<&mut tokio::time::Interval>) {
    match tick {
        Some(tick) => {
            tick.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn is_press(event: KeyEvent, codes: &[KeyCode]) -> bool {
    event.kind == KeyEventKind::Press
        && matches!(event.modifiers, KeyModifiers::NONE | KeyModifiers::SHIFT)
        && codes.contains(&event.code)
}

/// Dispatch one key press; `false` asks the loop to quit
fn handle_key(
    app: &mut bevy_app::App,
    event: KeyEvent,
    services: &Services,
    command: &system::Command,
    render_state: &mut RenderState,
) -> bool {
    if matches!(event, ctrl!('c')) {
        return false;
    }

    if HELP_VISIBLE.load(Ordering::Relaxed) {
        if is_press(event, &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('?')]) {
            HELP_VISIBLE.store(false, Ordering::Relaxed);
            render_state.mark_dirty(DirtyFlags::ALL);
        }
        return true;
    }

    let state = *app.world.resource::<State<AppState>>().get();
    match event {
        key!('?') | shift!('?') => {
            HELP_VISIBLE.store(true, Ordering::Relaxed);
            render_state.mark_dirty(DirtyFlags::POPUP_HELP);
        }
        key!('r') => {
            system::request_refresh(services, command);
            render_state.mark_dirty(DirtyFlags::STATUS);
        }
        _ if is_press(event, &[KeyCode::Esc, KeyCode::Char('q')]) => match state {
            AppState::Panel => return false,
            AppState::Chart => {
                app.world.insert_resource(NextState(Some(AppState::Panel)));
                render_state.mark_dirty(DirtyFlags::NONE.mark_state_change());
            }
        },
        _ if state == AppState::Chart => (),
        key!('c') => {
            system::copy_table(&mut app.world);
            render_state.mark_dirty(DirtyFlags::STATUS);
        }
        key!(Enter) => {
            send_evt(system::Key::Enter, &mut app.world);
            render_state.mark_dirty(DirtyFlags::STOCK_TABLE);
        }
        _ if is_press(event, &[KeyCode::Up, KeyCode::Char('k')]) => {
            send_evt(system::Key::Up, &mut app.world);
            render_state.mark_dirty(DirtyFlags::STOCK_TABLE);
        }
        _ if is_press(event, &[KeyCode::Down, KeyCode::Char('j')]) => {
            send_evt(system::Key::Down, &mut app.world);
            render_state.mark_dirty(DirtyFlags::STOCK_TABLE);
        }
        _ => (),
    }
    true
}

fn send_evt<T: Event>(evt: T, world: &mut World) {
    let mut state = SystemState::<EventWriter<T>>::new(world);
    state.get_mut(world).send(evt);
}
