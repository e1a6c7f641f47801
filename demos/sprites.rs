//! Bounces a few generated sprites around an 800x600 window.
//!
//! Run with `cargo run --example sprites`. Close the window or press Ctrl-C
//! to quit; both tear the engine down cleanly.

use kiln::prelude::*;

struct Ball {
    color: Color,
}

impl ObjectDescriptor for Ball {
    type Args = (u32, Rect);

    fn construct(&self, (radius, rect): Self::Args) -> Result<ObjectBuilder, ObjectError> {
        let size = radius * 2;
        let mut surface = Surface::transparent(size, size);
        let r = radius as i64;
        for y in 0..size {
            for x in 0..size {
                let (dx, dy) = (x as i64 - r, y as i64 - r);
                if dx * dx + dy * dy <= r * r {
                    surface.set_pixel(x, y, self.color);
                }
            }
        }
        Ok(ObjectBuilder::new(surface)
            .with_rect(Rect::new(rect.x, rect.y, size, size))
            .with_name("ball"))
    }
}

fn main() -> EngineResult<()> {
    let mut engine = Engine::new(EngineConfig::default().with_title("kiln sprites"))?;
    let (width, height) = engine.display().size();

    let panel = engine
        .renderer_mut()
        .objects_mut()
        .create(Surface::filled(200, 120, Color::rgb(30, 30, 60)));
    if let Some(object) = engine.renderer_mut().objects_mut().get_mut(panel) {
        object.rect.move_to(20, 20);
    }
    engine.render(panel, None)?;

    let palette = [
        Color::rgb(230, 80, 80),
        Color::rgb(80, 200, 120),
        Color::rgba(90, 140, 240, 180),
    ];
    let mut balls = Vec::new();
    for (i, color) in palette.into_iter().enumerate() {
        let start = Rect::at(100 + i as i32 * 150, 200 + i as i32 * 60);
        let id = engine
            .renderer_mut()
            .objects_mut()
            .create_with(&Ball { color }, (24, start))?;
        engine.render(id, None)?;
        balls.push((id, 3 + i as i32, 2 + i as i32));
    }

    let badge = engine
        .renderer_mut()
        .objects_mut()
        .create_with(&Ball { color: Color::WHITE }, (6, Rect::at(10, 10)))?;
    engine.render(badge, Some(Parent::Object(panel)))?;

    let scene = engine.load_scene(move |ctx: &mut SceneContext<'_>| {
        for (id, vx, vy) in balls.iter_mut() {
            let Some(ball) = ctx.objects_mut().get_mut(*id) else {
                continue;
            };
            ball.rect.translate(*vx, *vy);
            if ball.rect.x < 0 || ball.rect.right() > width as i64 {
                *vx = -*vx;
            }
            if ball.rect.y < 0 || ball.rect.bottom() > height as i64 {
                *vy = -*vy;
            }
        }
    });
    engine.render_scene(scene)?;

    engine.task_manager_mut().add_fn("banner", || {
        log::info!("sprites demo started, close the window to quit");
        Ok(())
    });

    engine.setup();
    engine.run()
}
