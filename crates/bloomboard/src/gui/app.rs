use crate::board::{self, Board, BoardAction};
use crate::events::{AppEvent, BlurJob};
use crate::gui::canvas::{self, BackdropCache, CairoSurface, IconCache};
use crate::gui::theme::{self, ThemeColors};
use bloom::blur::Backdrop;
use bloom::geometry::{Point, Rect};
use bloom::gesture::TimerToken;
use bloom::input::{PointerEvent, PointerKind};
use bloom::{Layer, Mode};
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

pub struct AppInit {
    pub board: Board,
    pub icons: IconCache,
    pub blur_tx: async_channel::Sender<BlurJob>,
    pub events: async_channel::Receiver<AppEvent>,
}

pub struct AppModel {
    board: Rc<RefCell<Board>>,
    icons: Rc<IconCache>,
    backdrops: Rc<BackdropCache>,
    background: Srgba<f64>,
    blur_tx: async_channel::Sender<BlurJob>,
    started: Instant,
    ticking: Rc<Cell<bool>>,
    overlay: gtk::Overlay,
    play_area: gtk::DrawingArea,
    overlay_area: gtk::DrawingArea,
    overlay_shown: bool,
}

#[derive(Debug)]
pub enum AppMsg {
    Pointer(PointerKind, f64, f64),
    Tick,
    LongPress { node: usize, token: TimerToken },
    BlurReady { node: usize, backdrop: Backdrop },
    SetMode(Mode),
    CollapseAll,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::BlurReady { node, backdrop } => AppMsg::BlurReady { node, backdrop },
        }
    }
}

fn paint_board(
    cr: &cairo::Context,
    board: &Board,
    icons: &IconCache,
    background: Srgba<f64>,
) -> anyhow::Result<()> {
    let (r, g, b, a) = background.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.paint()?;
    let mut surface = CairoSurface::new(cr, icons);
    board.draw_play_area(&mut surface)?;
    Ok(())
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Bloom board"),
            set_default_size: (960, 640),

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::CollapseAll);
                        return glib::Propagation::Stop;
                    }
                    match key.to_unicode().and_then(board::mode_for_key) {
                        Some(mode) => {
                            sender.input(AppMsg::SetMode(mode));
                            glib::Propagation::Stop
                        }
                        None => glib::Propagation::Proceed,
                    }
                }
            },

            #[name = "overlay"]
            gtk::Overlay {
                add_controller = gtk::GestureDrag {
                    connect_drag_begin[sender] => move |_, x, y| {
                        sender.input(AppMsg::Pointer(PointerKind::Down, x, y));
                    },
                    connect_drag_update[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::Pointer(PointerKind::Move, x + dx, y + dy));
                        }
                    },
                    connect_drag_end[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::Pointer(PointerKind::Up, x + dx, y + dy));
                        }
                    },
                    connect_cancel[sender] => move |_, _| {
                        sender.input(AppMsg::Pointer(PointerKind::Cancel, 0.0, 0.0));
                    }
                },

                #[name = "play_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            board,
            icons,
            blur_tx,
            events,
        } = init;

        theme::load_css();

        let overlay_area = gtk::DrawingArea::default();
        overlay_area.set_hexpand(true);
        overlay_area.set_vexpand(true);
        overlay_area.set_can_target(false);
        overlay_area.add_css_class("bloom-overlay-area");

        let model = AppModel {
            board: Rc::new(RefCell::new(board)),
            icons: Rc::new(icons),
            backdrops: Rc::new(BackdropCache::default()),
            background: Srgba::new(0.93, 0.93, 0.93, 1.0),
            blur_tx,
            started: Instant::now(),
            ticking: Rc::new(Cell::new(false)),
            overlay: gtk::Overlay::default(),
            play_area: gtk::DrawingArea::default(),
            overlay_area,
            overlay_shown: false,
        };

        let widgets = view_output!();

        let mut model = model;
        model.overlay = widgets.overlay.clone();
        model.play_area = widgets.play_area.clone();

        let colors = ThemeColors::from_context(&widgets.play_area.style_context());
        model.background = colors.background;
        model.board.borrow_mut().set_node_background(colors.node);

        let (board, icons, background) = (
            model.board.clone(),
            model.icons.clone(),
            model.background,
        );
        widgets.play_area.set_draw_func(move |_, cr, _, _| {
            if let Err(e) = paint_board(cr, &board.borrow(), &icons, background) {
                log::error!("Drawing error: {}", e);
            }
        });

        let (board, icons, backdrops) = (
            model.board.clone(),
            model.icons.clone(),
            model.backdrops.clone(),
        );
        model
            .overlay_area
            .set_draw_func(move |_, cr, width, height| {
                let viewport = Rect::new(0.0, 0.0, width as f64, height as f64);
                let mut surface = CairoSurface::new(cr, &icons).with_backdrops(&backdrops);
                if let Err(e) = board.borrow().draw_overlay(&mut surface, viewport) {
                    log::error!("Overlay drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = events.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        let now = self.started.elapsed();
        let actions = match msg {
            AppMsg::Pointer(kind, x, y) => {
                let event = PointerEvent::new(kind, Point::new(x, y), now);
                self.board.borrow_mut().handle_pointer(&event)
            }
            AppMsg::Tick => self.board.borrow_mut().tick(now),
            AppMsg::LongPress { node, token } => self.board.borrow_mut().on_long_press(node, token),
            AppMsg::BlurReady { node, backdrop } => {
                self.backdrops.clear();
                self.board.borrow_mut().on_blur_ready(node, backdrop, now)
            }
            AppMsg::SetMode(mode) => self.board.borrow_mut().set_mode(mode),
            AppMsg::CollapseAll => self.board.borrow_mut().collapse_all(now),
        };

        for action in actions {
            self.perform(action, &sender);
        }
        self.keep_ticking(&sender);
    }
}

impl AppModel {
    fn perform(&mut self, action: BoardAction, sender: &ComponentSender<Self>) {
        match action {
            BoardAction::ScheduleLongPress { node, token, delay } => {
                let sender = sender.clone();
                glib::timeout_add_local_once(delay, move || {
                    sender.input(AppMsg::LongPress { node, token });
                });
            }
            BoardAction::RequestBlur { node, radius } => self.request_blur(node, radius, sender),
            BoardAction::ShowOverlay(node) => {
                if !self.overlay_shown {
                    self.overlay.add_overlay(&self.overlay_area);
                    self.overlay_shown = true;
                    log::debug!("overlay shown for node {node}");
                }
                self.overlay_area.queue_draw();
            }
            BoardAction::HideOverlay(node) => {
                if self.overlay_shown {
                    self.overlay.remove_overlay(&self.overlay_area);
                    self.overlay_shown = false;
                    log::debug!("overlay removed for node {node}");
                }
                self.backdrops.clear();
                self.play_area.queue_draw();
            }
            BoardAction::Redraw(Layer::Widget) => self.play_area.queue_draw(),
            BoardAction::Redraw(Layer::Overlay) => self.overlay_area.queue_draw(),
        }
    }

    /// Snapshots the board and queues it for blurring. Failures hand the
    /// node an unblurred or empty backdrop so it can still expand.
    fn request_blur(&self, node: usize, radius: f64, sender: &ComponentSender<Self>) {
        let snapshot = {
            let board = self.board.borrow();
            canvas::snapshot(self.play_area.width(), self.play_area.height(), |cr| {
                paint_board(cr, &board, &self.icons, self.background)
            })
        };

        match snapshot {
            Ok(backdrop) => {
                let job = BlurJob {
                    node,
                    radius,
                    backdrop,
                };
                if let Err(e) = self.blur_tx.try_send(job) {
                    log::error!("Failed to queue blur job: {}", e);
                    let job = e.into_inner();
                    sender.input(AppMsg::BlurReady {
                        node,
                        backdrop: job.backdrop,
                    });
                }
            }
            Err(e) => {
                log::error!("Failed to snapshot board: {}", e);
                sender.input(AppMsg::BlurReady {
                    node,
                    backdrop: Backdrop::new(0, 0, Vec::new()),
                });
            }
        }
    }

    /// Drives `Tick` from the frame clock until every node has settled.
    fn keep_ticking(&self, sender: &ComponentSender<Self>) {
        if self.ticking.get() || !self.board.borrow().is_animating() {
            return;
        }
        self.ticking.set(true);

        let (board, ticking, sender) = (self.board.clone(), self.ticking.clone(), sender.clone());
        self.play_area.add_tick_callback(move |_, _| {
            if board.borrow().is_animating() {
                sender.input(AppMsg::Tick);
                glib::ControlFlow::Continue
            } else {
                ticking.set(false);
                glib::ControlFlow::Break
            }
        });
    }
}
