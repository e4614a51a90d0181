//! # Tick Pipeline
//!
//! ```text
//! tick:
//!   1. input      Control -> velocity from buttons, InputHandler -> callback
//!   2. movement   Move -> position += velocity, clamped to the screen
//!   3. collision  every Collider pair i < j -> i(receiver=i, peer=j), j(receiver=j, peer=i)
//!   4. lifetime   Health with hp == 0 -> flags cleared
//!   5. timer      Timer -> count, fire and reset at threshold
//!   6. render     Text -> rows written to the draw context
//! ```
//!
//! Each pass walks the slots in increasing id order and reads flags live:
//! a callback that spawns, removes or re-flags an entity is seen by later
//! entities of the same pass.
//!
//! Handlers are cloned out of storage before they run so they can take
//! `&mut Engine`. A capability without its handler is skipped and reported
//! at debug level.

use super::engine::{id_at, Engine};
use super::entity::{Capabilities, EntityId};

impl Engine {
    /// Runs all six passes once.
    pub fn tick(&mut self) {
        self.input_pass();
        self.movement_pass();
        self.collision_pass();
        self.lifetime_pass();
        self.timer_pass();
        self.render_pass();
        self.tick_count += 1;
        tracing::trace!("Tick {} complete", self.tick_count);
    }

    /// Pass 1: controlled velocity and input callbacks.
    ///
    /// Controlled entities get their velocity overwritten: right/left set
    /// `vx` to ±1 (right wins), down/up set `vy` to ±1 (down wins), released
    /// axes are zeroed. Pressing left after up therefore moves straight left
    /// rather than diagonally; use an input handler such as
    /// [`crate::prefabs::non_inverting_control`] to keep the other axis.
    pub fn input_pass(&mut self) {
        let input = self.input;
        let vx = if input.right {
            1
        } else if input.left {
            -1
        } else {
            0
        };
        let vy = if input.down {
            1
        } else if input.up {
            -1
        } else {
            0
        };

        for index in 0..self.capacity() {
            let caps = self.entities[index];
            if caps.is_empty() {
                continue;
            }

            if caps.contains(Capabilities::CONTROL) {
                let velocity = &mut self.velocities.as_mut_slice()[index];
                velocity.vx = vx;
                velocity.vy = vy;
            }

            if caps.contains(Capabilities::INPUT_HANDLER) {
                let id = id_at(index);
                let handler = self.input_handlers.as_slice()[index].handler.clone();
                match handler {
                    Some(handler) => handler.call(self, id, input),
                    None => report_missing("input handler", id),
                }
            }
        }
    }

    /// Pass 2: integrate velocity, then clamp onto the screen unless
    /// off-screen movement is enabled.
    pub fn movement_pass(&mut self) {
        let clamp = !self.config().move_outside_screen;
        let last_col = self.config().last_column();
        let last_row = self.config().last_row();

        let velocities = self.velocities.as_slice();
        let positions = self.positions.as_mut_slice();

        for (index, caps) in self.entities.iter().enumerate() {
            if !caps.contains(Capabilities::MOVE) {
                continue;
            }
            let velocity = velocities[index];
            let position = &mut positions[index];

            position.x = position.x.saturating_add(velocity.vx);
            position.y = position.y.saturating_add(velocity.vy);

            if clamp {
                position.x = position.x.clamp(0, last_col);
                position.y = position.y.clamp(0, last_row);
            }
        }
    }

    /// Pass 3: offer every collider pair to both participants.
    ///
    /// No overlap test happens here; handlers decide with
    /// [`crate::prefabs::test_hit`] or their own rule.
    pub fn collision_pass(&mut self) {
        let capacity = self.capacity();
        for i in 0..capacity {
            if !self.entities[i].contains(Capabilities::COLLIDER) {
                continue;
            }
            for j in (i + 1)..capacity {
                if !self.entities[j].contains(Capabilities::COLLIDER) {
                    continue;
                }
                let (a, b) = (id_at(i), id_at(j));
                self.dispatch_collision(a, b);
                self.dispatch_collision(b, a);
            }
        }
    }

    fn dispatch_collision(&mut self, receiver: EntityId, peer: EntityId) {
        let handler = self.colliders.as_slice()[receiver.index()].handler.clone();
        match handler {
            Some(handler) => handler.call(self, receiver, peer),
            None => report_missing("collider", receiver),
        }
    }

    /// Pass 4: free every Health entity whose hitpoints are exactly zero.
    pub fn lifetime_pass(&mut self) {
        let hitpoints = self.hitpoints.as_slice();
        for (index, caps) in self.entities.iter_mut().enumerate() {
            if caps.contains(Capabilities::HEALTH) && hitpoints[index].hp == 0 {
                caps.clear();
                tracing::trace!("Culled entity {}", id_at(index));
            }
        }
    }

    /// Pass 5: advance timers and fire those that reached their threshold.
    ///
    /// The counter is reset before the callback runs, so a callback may
    /// re-arm or replace its own timer.
    pub fn timer_pass(&mut self) {
        for index in 0..self.capacity() {
            if !self.entities[index].contains(Capabilities::TIMER) {
                continue;
            }

            let timer = &mut self.timers.as_mut_slice()[index];
            timer.current_frame = timer.current_frame.saturating_add(1);
            if timer.current_frame < timer.frame_count {
                continue;
            }
            timer.current_frame = 0;

            let id = id_at(index);
            let handler = timer.handler.clone();
            match handler {
                Some(handler) => {
                    tracing::trace!("Timer fired for entity {}", id);
                    handler.call(self, id);
                }
                None => report_missing("timer", id),
            }
        }
    }

    /// Pass 6: draw every text row of every Text entity.
    ///
    /// Rows land at (x, y + row) and are clipped by the draw context.
    /// Dirty rows are then pushed to an attached sink.
    pub fn render_pass(&mut self) {
        let rows = usize::from(self.config().screen_height);

        for index in 0..self.capacity() {
            if !self.entities[index].contains(Capabilities::TEXT) {
                continue;
            }
            let position = self.positions.as_slice()[index];
            let text = &self.texts.as_slice()[index];
            for (offset, row) in (0..rows).zip(0_i16..) {
                if let Some(content) = text.row(offset) {
                    self.draw
                        .draw_row(position.x, position.y.saturating_add(row), content);
                }
            }
        }

        self.draw.present();
    }
}

fn report_missing(kind: &'static str, id: EntityId) {
    tracing::debug!("Entity {} has the {} capability but no handler; skipped", id, kind);
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use rowguelike_shared::RawInput;

    use crate::config::EngineConfig;
    use crate::ecs::builder::EntityBuilder;
    use crate::ecs::component::{Position, Velocity};
    use crate::ecs::engine::Engine;
    use crate::ecs::entity::{Capabilities, EntityId};

    fn engine() -> Engine {
        Engine::new(EngineConfig::with_capacity(8)).unwrap()
    }

    #[test]
    fn test_control_overrides_velocity() {
        let mut engine = engine();
        let id = EntityBuilder::new()
            .control()
            .velocity(0, 0)
            .position(5, 0)
            .spawn(&mut engine)
            .unwrap();

        engine.set_input(RawInput { right: true, down: true, ..RawInput::NONE });
        engine.input_pass();
        assert_eq!(*engine.velocity(id), Velocity::new(1, 1));

        engine.set_input(RawInput { left: true, ..RawInput::NONE });
        engine.input_pass();
        assert_eq!(*engine.velocity(id), Velocity::new(-1, 0));

        engine.set_input(RawInput::NONE);
        engine.input_pass();
        assert_eq!(*engine.velocity(id), Velocity::ZERO);

        // Left after up drops the vertical component.
        engine.set_input(RawInput { up: true, ..RawInput::NONE });
        engine.input_pass();
        engine.set_input(RawInput { left: true, ..RawInput::NONE });
        engine.input_pass();
        assert_eq!(*engine.velocity(id), Velocity::new(-1, 0));
    }

    #[test]
    fn test_input_handlers_in_id_order() {
        let mut engine = engine();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for _ in 0..3 {
            let seen = Rc::clone(&seen);
            EntityBuilder::new()
                .input_handler(move |_, id, input| seen.borrow_mut().push((id, input.select)))
                .spawn(&mut engine)
                .unwrap();
        }

        engine.set_input(RawInput { select: true, ..RawInput::NONE });
        engine.input_pass();

        let seen = seen.borrow();
        assert_eq!(
            *seen,
            vec![
                (EntityId::new(0), true),
                (EntityId::new(1), true),
                (EntityId::new(2), true),
            ]
        );
    }

    #[test]
    fn test_movement_clamps_to_last_cell() {
        let mut engine = engine();
        let fast = EntityBuilder::new()
            .position(14, 1)
            .velocity(5, 3)
            .spawn(&mut engine)
            .unwrap();
        let back = EntityBuilder::new()
            .position(0, 0)
            .velocity(-2, -1)
            .spawn(&mut engine)
            .unwrap();

        engine.movement_pass();

        assert_eq!(*engine.position(fast), Position::new(15, 1));
        assert_eq!(*engine.position(back), Position::new(0, 0));
    }

    #[test]
    fn test_movement_unclamped_off_screen() {
        let mut engine = Engine::new(EngineConfig {
            move_outside_screen: true,
            ..EngineConfig::with_capacity(2)
        })
        .unwrap();
        let id = EntityBuilder::new()
            .position(15, 1)
            .velocity(2, -3)
            .spawn(&mut engine)
            .unwrap();

        engine.movement_pass();
        assert_eq!(*engine.position(id), Position::new(17, -2));
    }

    #[test]
    fn test_logic_velocity_not_integrated() {
        let mut engine = engine();
        let id = EntityBuilder::new()
            .position(2, 0)
            .velocity_without_move(1, 0)
            .text("v")
            .spawn(&mut engine)
            .unwrap();

        engine.movement_pass();
        assert_eq!(engine.position(id).x, 2);
    }

    #[test]
    fn test_collision_pairs_both_directions() {
        let mut engine = engine();
        let calls = Rc::new(RefCell::new(Vec::new()));
        for x in [0, 4, 9] {
            let calls = Rc::clone(&calls);
            EntityBuilder::new()
                .position(x, 0)
                .collider(1, move |_, receiver, peer| {
                    calls.borrow_mut().push((receiver.raw(), peer.raw()));
                })
                .spawn(&mut engine)
                .unwrap();
        }
        EntityBuilder::new().text("not a collider").spawn(&mut engine).unwrap();

        engine.collision_pass();

        assert_eq!(
            *calls.borrow(),
            vec![(0, 1), (1, 0), (0, 2), (2, 0), (1, 2), (2, 1)]
        );
    }

    #[test]
    fn test_missing_collider_handler_is_skipped() {
        let mut engine = engine();
        let hits = Rc::new(Cell::new(0));
        engine
            .make(Capabilities::COLLIDER)
            .spawn(&mut engine)
            .unwrap();
        let counter = Rc::clone(&hits);
        EntityBuilder::new()
            .collider(0, move |_, _, _| counter.set(counter.get() + 1))
            .spawn(&mut engine)
            .unwrap();

        engine.tick();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_collider_removed_mid_pass_gets_no_more_pairs() {
        let mut engine = engine();
        let calls = Rc::new(RefCell::new(Vec::new()));
        for _ in 0..3 {
            let calls = Rc::clone(&calls);
            EntityBuilder::new()
                .collider(1, move |engine, receiver, peer| {
                    calls.borrow_mut().push((receiver.raw(), peer.raw()));
                    if receiver.raw() == 0 {
                        engine.remove(EntityId::new(2));
                    }
                })
                .spawn(&mut engine)
                .unwrap();
        }

        engine.collision_pass();

        assert_eq!(*calls.borrow(), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_input_handler_removed_mid_pass_skipped() {
        let mut engine = engine();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for _ in 0..2 {
            let seen = Rc::clone(&seen);
            EntityBuilder::new()
                .input_handler(move |engine, id, _| {
                    seen.borrow_mut().push(id.raw());
                    engine.remove(EntityId::new(1));
                })
                .spawn(&mut engine)
                .unwrap();
        }

        engine.input_pass();

        assert_eq!(*seen.borrow(), vec![0]);
        assert!(!engine.is_active(EntityId::new(1)));
    }

    #[test]
    fn test_lifetime_culls_exact_zero_only() {
        let mut engine = engine();
        let dead = EntityBuilder::new().hitpoints(0).spawn(&mut engine).unwrap();
        let negative = EntityBuilder::new()
            .hitpoints(-1)
            .spawn(&mut engine)
            .unwrap();
        let alive = EntityBuilder::new().hitpoints(2).spawn(&mut engine).unwrap();
        let no_health = engine
            .make(Capabilities::TEXT)
            .spawn(&mut engine)
            .unwrap();

        engine.lifetime_pass();

        assert!(!engine.is_active(dead));
        assert!(engine.is_active(negative));
        assert!(engine.is_active(alive));
        assert!(engine.is_active(no_health));
    }

    #[test]
    fn test_damage_takes_effect_at_lifetime_pass() {
        let mut engine = engine();
        let victim = EntityBuilder::new()
            .hitpoints(1)
            .each_tick(|engine, id| engine.hitpoints_mut(id).hp = 0)
            .spawn(&mut engine)
            .unwrap();

        // Timer runs after lifetime: zeroed this tick, culled next tick.
        engine.tick();
        assert!(engine.is_active(victim));
        assert_eq!(engine.hitpoints(victim).hp, 0);

        engine.tick();
        assert!(!engine.is_active(victim));
    }

    #[test]
    fn test_timer_threshold() {
        let mut engine = engine();
        let fired = Rc::new(Cell::new(0_u32));
        let counter = Rc::clone(&fired);
        let id = EntityBuilder::new()
            .timer(3, move |_, _| counter.set(counter.get() + 1))
            .spawn(&mut engine)
            .unwrap();

        let mut history = Vec::new();
        for _ in 0..9 {
            engine.timer_pass();
            history.push(fired.get());
            assert!(engine.timer(id).current_frame < 3);
        }
        assert_eq!(history, vec![0, 0, 1, 1, 1, 2, 2, 2, 3]);
    }

    #[test]
    fn test_timer_self_removal_visible_immediately() {
        let mut engine = engine();
        let id = EntityBuilder::new()
            .text("x")
            .timer(1, |engine, id| engine.remove(id))
            .spawn(&mut engine)
            .unwrap();

        engine.tick();
        assert!(!engine.is_active(id));
        // Removed before the render pass ran.
        assert_eq!(engine.draw().row_text(0).unwrap(), " ".repeat(16));
    }

    #[test]
    fn test_callback_spawn_seen_later_in_same_pass() {
        let mut engine = engine();
        let fired = Rc::new(Cell::new(0_u32));
        let counter = Rc::clone(&fired);
        EntityBuilder::new()
            .each_tick(move |engine, _| {
                let counter = Rc::clone(&counter);
                let _ = EntityBuilder::new()
                    .each_tick(move |_, _| counter.set(counter.get() + 1))
                    .spawn(engine);
            })
            .spawn(&mut engine)
            .unwrap();

        engine.timer_pass();
        assert_eq!(fired.get(), 1);
        assert_eq!(engine.active_count(), 2);
    }

    #[test]
    fn test_render_rows_relative_to_position() {
        let mut engine = engine();
        EntityBuilder::new()
            .position(3, 0)
            .text_line(0, "ab")
            .text_line(1, "cd")
            .spawn(&mut engine)
            .unwrap();

        engine.render_pass();

        assert_eq!(engine.draw().row_text(0).unwrap(), "   ab           ");
        assert_eq!(engine.draw().row_text(1).unwrap(), "   cd           ");
    }

    #[test]
    fn test_render_empty_row_keeps_buffer() {
        let mut engine = engine();
        engine.draw_mut().add_text(0, 1, "keep");
        EntityBuilder::new()
            .text("top")
            .spawn(&mut engine)
            .unwrap();

        engine.render_pass();

        assert_eq!(engine.draw().row_text(0).unwrap(), "top             ");
        assert_eq!(engine.draw().row_text(1).unwrap(), "keep            ");
    }

    #[test]
    fn test_tick_counts() {
        let mut engine = engine();
        engine.tick();
        engine.tick();
        assert_eq!(engine.tick_count(), 2);
    }
}
