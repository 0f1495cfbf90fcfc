//! Active gameplay: runs the simulation at a fixed rate and draws it

use glam::Vec2;

use super::widgets::{LABEL_COLOR, STAT_BOX_SIZE, arena_frame, stat_box};
use super::{SceneContext, SceneKind};
use crate::consts::{MAX_SUBSTEPS, SHAPE_FONT_SIZE, SIM_DT, TEXT_FONT_SIZE};
use crate::math::{Rect, Transform2D};
use crate::platform::{InputState, Key};
use crate::progression::PlayerData;
use crate::renderer::shapes::{low_value_color, text};
use crate::renderer::{Color, RenderData, RenderId, RenderIds, RenderLayer, RenderObject, RenderSink};
use crate::sim::{AsteroidKind, FlightState, GameEvent, Ship, TickInput, tick};
use crate::tuning::Tuning;

/// Longest frame the accumulator accepts (tab switches, debugger pauses)
const MAX_FRAME_DELTA: f32 = 0.1;

const PROJECTILE_GLYPH: &str = "|";
const PARTICLE_GLYPH: &str = "#";
/// Exhaust flame glyphs, nearest the hull first
const EXHAUST: [(f32, Color); 3] = [
    (0.3, Color::THRUST_YELLOW),
    (0.5, Color::THRUST_YELLOW),
    (0.7, Color::THRUST_ORANGE),
];

impl TickInput {
    /// Arrow keys steer and thrust, space fires, escape leaves
    pub fn from_input(input: &InputState) -> Self {
        let rotate = if input.key(Key::ArrowLeft).is_pressed() {
            -1.0
        } else if input.key(Key::ArrowRight).is_pressed() {
            1.0
        } else {
            0.0
        };
        Self {
            rotate,
            thrust: input.key(Key::ArrowUp).is_pressed(),
            fire: input.key(Key::Space).is_pressed(),
            exit: input.key(Key::Escape).is_pressed(),
        }
    }
}

pub struct FlightScene {
    view: Rect,
    state: FlightState,
    accumulator: f32,
}

impl FlightScene {
    pub fn new(seed: u64, view: Rect, player: &PlayerData, tuning: Tuning) -> Self {
        Self {
            view,
            state: FlightState::new(seed, view, player, tuning),
            accumulator: 0.0,
        }
    }

    pub fn state(&self) -> &FlightState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FlightState {
        &mut self.state
    }

    /// Run the fixed steps owed for this frame; returns the next screen once
    /// the flight is over
    pub fn update(&mut self, ctx: &mut SceneContext) -> Option<SceneKind> {
        let input = TickInput::from_input(ctx.input);

        self.accumulator += ctx.frame.delta.clamp(0.0, MAX_FRAME_DELTA);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &input, ctx.player, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop whatever backlog the cap left behind
            self.accumulator = 0.0;
        }

        for event in self.state.drain_events() {
            match event {
                GameEvent::Sound(request) => ctx.sounds.play(&request),
                GameEvent::OreCollected { amount, streak } => {
                    log::debug!("+{} ore (streak {}), {} total", amount, streak, ctx.player.ore);
                }
                GameEvent::AsteroidBroken { id } => log::debug!("asteroid {} broke apart", id),
                GameEvent::ShipDestroyed => log::info!("Ship lost after {:.1}s", self.state.time),
                GameEvent::FlightOver(outcome) => {
                    log::info!("Flight over ({:?}), {} ore banked", outcome, ctx.player.ore);
                }
            }
        }

        self.state.outcome().map(|_| SceneKind::Station)
    }

    pub fn render(&self, player: &PlayerData, sink: &mut dyn RenderSink) {
        let state = &self.state;

        for asteroid in &state.asteroids {
            let layer = match asteroid.kind {
                AsteroidKind::Background => RenderLayer::Background,
                _ => RenderLayer::Asteroid,
            };
            sink.submit(RenderObject::new(
                RenderId::new(layer, asteroid.id),
                asteroid.transform(),
                asteroid.color(),
                RenderData::Text {
                    text: asteroid.shape.to_text(),
                    font_size: SHAPE_FONT_SIZE,
                },
            ));
        }

        if !state.ship.is_destroyed() {
            render_ship(&state.ship, sink);
        }

        for projectile in &state.projectiles {
            sink.submit(RenderObject::new(
                RenderId::new(RenderLayer::Projectile, projectile.id),
                Transform2D::new(projectile.position, projectile.render_rotation(), Vec2::ONE),
                Color::LASER_RED,
                RenderData::Text {
                    text: PROJECTILE_GLYPH.to_string(),
                    font_size: TEXT_FONT_SIZE,
                },
            ));
        }

        for (index, particle) in state.particles.iter().enumerate() {
            sink.submit(RenderObject::new(
                RenderId::new(RenderLayer::Particle, index as u32),
                Transform2D::new(particle.position, particle.rotation, Vec2::ONE),
                particle.color,
                RenderData::Text {
                    text: PARTICLE_GLYPH.to_string(),
                    font_size: particle.size,
                },
            ));
        }

        arena_frame(&mut RenderIds::new(RenderLayer::Arena), sink, self.view, state.bounds);
        self.render_hud(player, sink);
    }

    fn render_hud(&self, player: &PlayerData, sink: &mut dyn RenderSink) {
        let ship = &self.state.ship;
        let mut ids = RenderIds::new(RenderLayer::Hud);
        let mut position = self.state.bounds.min + Vec2::new(20.0, 20.0);
        let stats = [
            ("HULL", format!("{}", ship.health.ceil().max(0.0) as i64), Color::GREY),
            ("FUEL", format!("{}", ship.fuel.floor() as i64), low_value_color(ship.fuel, 50.0)),
            ("ORE", player.ore.to_string(), Color::GREY),
        ];
        for (label, value, color) in stats {
            let rect = Rect::from_position_size(position, STAT_BOX_SIZE);
            stat_box(&mut ids, sink, rect, (label, LABEL_COLOR), (value.as_str(), color));
            position.y += STAT_BOX_SIZE.y + 10.0;
        }

        if ship.is_out_of_fuel() {
            sink.submit(text(
                ids.next_id(),
                self.state.bounds.center() + Vec2::new(0.0, 200.0),
                "You are out of fuel. Press [Escape] to return to the station.",
                TEXT_FONT_SIZE,
                Color::GREY,
            ));
        }
    }
}

fn render_ship(ship: &Ship, sink: &mut dyn RenderSink) {
    let rotation = ship.glyph_rotation();
    sink.submit(RenderObject::new(
        RenderId::new(RenderLayer::Ship, 0),
        Transform2D::new(ship.position, rotation, Vec2::ONE),
        ship.color(),
        RenderData::Text {
            text: "A".to_string(),
            font_size: ship.size,
        },
    ));
    if !ship.is_thrusting() {
        return;
    }
    for (index, (scale, color)) in EXHAUST.iter().enumerate() {
        sink.submit(RenderObject::new(
            RenderId::new(RenderLayer::Ship, index as u32 + 1),
            Transform2D::new(ship.position + ship.exhaust_offset(index), rotation, Vec2::ONE),
            *color,
            RenderData::Text {
                text: "V".to_string(),
                font_size: ship.size * scale,
            },
        ));
    }
}
