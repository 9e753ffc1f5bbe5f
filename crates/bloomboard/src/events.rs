use bloom::blur::Backdrop;

/// Work handed to the blur thread.
#[derive(Debug)]
pub struct BlurJob {
    pub node: usize,
    pub radius: f64,
    pub backdrop: Backdrop,
}

/// Messages coming back from background services.
#[derive(Debug)]
pub enum AppEvent {
    BlurReady { node: usize, backdrop: Backdrop },
}
