use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarpRequest {
    pub dest_level: i16,
    pub dest_area: i16,
    pub dest_warp_node: i16,
    pub arg: i32,
}

/// Level transition state the bridge is allowed to touch.
#[derive(Debug, Default)]
pub struct WarpState {
    curr_level: i16,
    change_level: Option<i16>,
    pending: Option<WarpRequest>,
    after_warp_inits: u32,
}

impl WarpState {
    pub fn new(curr_level: i16) -> Self {
        Self {
            curr_level,
            ..Default::default()
        }
    }

    pub fn curr_level(&self) -> i16 {
        self.curr_level
    }

    pub fn set_curr_level(&mut self, level: i16) {
        self.curr_level = level;
    }

    /// Queue a warp; replaces any warp not yet taken.
    pub fn initiate_warp(&mut self, request: WarpRequest) {
        log::debug!("warp requested: {:?}", request);
        self.pending = Some(request);
    }

    /// Request a reload of the current level.
    pub fn reset_level(&mut self) {
        self.change_level = Some(self.curr_level);
    }

    /// Re-run the player initialization that normally follows a warp.
    pub fn init_after_warp(&mut self) {
        self.after_warp_inits += 1;
    }

    pub fn pending(&self) -> Option<&WarpRequest> {
        self.pending.as_ref()
    }

    pub fn change_level(&self) -> Option<i16> {
        self.change_level
    }

    pub fn after_warp_inits(&self) -> u32 {
        self.after_warp_inits
    }

    /// Consume the queued warp, if any.
    pub fn take_pending(&mut self) -> Option<WarpRequest> {
        self.pending.take()
    }
}
