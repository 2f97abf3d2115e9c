use baguette_engine::{
    Game, GameConfig, EngineContext,
    InputEvent, InputQueue,
    FixedTimestep, ProtocolLayout,
};
use baguette_engine::bridge::protocol::{
    HEADER_CLOCK_MS, HEADER_EVENT_COUNT, HEADER_FRAME_COUNTER, HEADER_SOUND_COUNT,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    initialized: bool,
    frame_counter: u32,
    /// Flat buffer of sound event IDs for direct reads.
    sound_buffer: Vec<u8>,
    /// Header + sounds + events, laid out per `ProtocolLayout`.
    frame_buffer: Vec<f32>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);
        let layout = ProtocolLayout::from_config(&config);

        let sound_buffer = Vec::with_capacity(config.max_sounds);
        let frame_buffer = vec![0.0; layout.buffer_total_floats];

        Self {
            game,
            ctx: EngineContext::new(),
            input: InputQueue::new(),
            timestep,
            layout,
            config,
            initialized: false,
            frame_counter: 0,
            sound_buffer,
            frame_buffer,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.game.config();
        self.timestep = FixedTimestep::new(self.config.fixed_dt);
        self.layout = ProtocolLayout::from_config(&self.config);
        self.frame_buffer = vec![0.0; self.layout.buffer_total_floats];
        self.frame_buffer[..self.layout.sound_data_offset].copy_from_slice(&self.layout.header());
        self.game.init(&mut self.ctx);
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame tick: fixed-step updates, then pack sounds and events.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        // Fixed timestep accumulation
        let steps = self.timestep.accumulate(dt);
        for step in 0..steps {
            self.ctx.clock.advance(self.timestep.dt());
            self.game.update(&mut self.ctx, &self.input);
            // Input belongs to the first step of the frame only. A frame with
            // no step leaves it queued for the next frame.
            if step == 0 {
                self.input.drain();
            }
        }

        self.enforce_capacities();

        // Pack sound events into flat buffer
        self.sound_buffer.clear();
        for sound in &self.ctx.sounds {
            self.sound_buffer.push(sound.0 as u8);
        }

        self.write_frame();
    }

    fn enforce_capacities(&mut self) {
        if self.ctx.sounds.len() > self.layout.max_sounds {
            log::warn!(
                "dropping {} sound events over capacity {}",
                self.ctx.sounds.len() - self.layout.max_sounds,
                self.layout.max_sounds
            );
            self.ctx.sounds.truncate(self.layout.max_sounds);
        }
        if self.ctx.events.len() > self.layout.max_events {
            log::warn!(
                "dropping {} game events over capacity {}",
                self.ctx.events.len() - self.layout.max_events,
                self.layout.max_events
            );
            self.ctx.events.truncate(self.layout.max_events);
        }
    }

    fn write_frame(&mut self) {
        self.frame_counter = self.frame_counter.wrapping_add(1);
        let layout = &self.layout;
        let frame = &mut self.frame_buffer;

        frame[HEADER_FRAME_COUNTER] = self.frame_counter as f32;
        frame[HEADER_SOUND_COUNT] = self.ctx.sounds.len() as f32;
        frame[HEADER_EVENT_COUNT] = self.ctx.events.len() as f32;
        frame[HEADER_CLOCK_MS] = self.ctx.now_ms() as f32;

        let sounds = &mut frame[layout.sound_data_offset..layout.event_data_offset];
        sounds.fill(0.0);
        for (slot, sound) in sounds.iter_mut().zip(&self.ctx.sounds) {
            *slot = sound.0 as f32;
        }

        let events = &mut frame[layout.event_data_offset..layout.buffer_total_floats];
        events.fill(0.0);
        for (slot, event) in events.chunks_exact_mut(4).zip(&self.ctx.events) {
            slot.copy_from_slice(event.as_floats());
        }
    }

    /// The hosted game, for game-specific exports.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Read-only view of the engine context after the last tick.
    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    // ---- Pointer accessors for shared-buffer reads ----

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame_buffer.as_ptr()
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_sounds(&self) -> u32 {
        self.layout.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    #[cfg(test)]
    fn frame(&self) -> &[f32] {
        &self.frame_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baguette_engine::bridge::protocol::HEADER_PROTOCOL_VERSION;
    use baguette_engine::{GameEvent, SoundEvent};

    /// Echoes every pointer-down as a sound and counts updates.
    #[derive(Default)]
    struct Echo {
        updates: u32,
        presses_seen: u32,
    }

    impl Game for Echo {
        fn config(&self) -> GameConfig {
            GameConfig {
                max_sounds: 2,
                ..GameConfig::default()
            }
        }

        fn init(&mut self, _ctx: &mut EngineContext) {}

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.updates += 1;
            for event in input.iter() {
                if let InputEvent::PointerDown { .. } = event {
                    self.presses_seen += 1;
                    ctx.emit_sound(SoundEvent(9));
                }
            }
            ctx.emit_event(GameEvent::new(1.0, ctx.now_ms() as f32, 0.0, 0.0));
        }
    }

    #[test]
    fn tick_before_init_is_ignored() {
        let mut runner = GameRunner::new(Echo::default());
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.game().updates, 0);
    }

    #[test]
    fn input_is_seen_by_one_step_only() {
        let mut runner = GameRunner::new(Echo::default());
        runner.init();
        runner.push_input(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        // Three fixed steps in one frame.
        runner.tick(3.0 / 60.0 + 0.001);

        assert_eq!(runner.game().updates, 3);
        assert_eq!(runner.game().presses_seen, 1);
        assert_eq!(runner.sound_events_len(), 1);
    }

    #[test]
    fn input_waits_for_a_frame_with_a_step() {
        let mut runner = GameRunner::new(Echo::default());
        runner.init();
        runner.push_input(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        // Under one fixed step: no update, input stays queued.
        runner.tick(0.005);
        assert_eq!(runner.game().updates, 0);
        assert_eq!(runner.game().presses_seen, 0);

        runner.tick(1.0 / 60.0);
        assert_eq!(runner.game().updates, 1);
        assert_eq!(runner.game().presses_seen, 1);
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.game().presses_seen, 1);
    }

    #[test]
    fn clock_advances_per_step() {
        let mut runner = GameRunner::new(Echo::default());
        runner.init();
        // 6.3 steps worth of frame time runs 6 steps.
        runner.tick(0.105);
        let expected = 6.0 * 1000.0 / 60.0;
        assert_eq!(runner.game().updates, 6);
        assert!((runner.context().now_ms() - expected).abs() < 0.01);
    }

    #[test]
    fn sounds_over_capacity_are_dropped() {
        let mut runner = GameRunner::new(Echo::default());
        runner.init();
        for _ in 0..5 {
            runner.push_input(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        }
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.sound_events_len(), 2);
    }

    #[test]
    fn frame_buffer_follows_layout() {
        let mut runner = GameRunner::new(Echo::default());
        runner.init();
        runner.push_input(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        runner.tick(1.0 / 60.0);

        let frame = runner.frame();
        assert_eq!(frame.len(), runner.buffer_total_floats() as usize);
        assert_eq!(frame[HEADER_PROTOCOL_VERSION], 1.0);
        assert_eq!(frame[HEADER_FRAME_COUNTER], 1.0);
        assert_eq!(frame[HEADER_SOUND_COUNT], 1.0);
        assert_eq!(frame[HEADER_EVENT_COUNT], 1.0);

        let sound_offset = ProtocolLayout::from_config(&runner.game().config()).sound_data_offset;
        assert_eq!(frame[sound_offset], 9.0);
    }
}
