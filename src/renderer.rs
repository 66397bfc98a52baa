// Draws one frame of a particle field: clear, particles, then the
// proximity lines on top at low alpha.

use crate::color::Color;
use crate::field::ParticleField;
use crate::surface::Surface;
use rand::Rng;

pub fn render_frame<R: Rng, S: Surface>(
    field: &ParticleField<R>,
    surface: &mut S,
) -> Result<(), String> {
    surface.clear()?;
    render_particles(field, surface)?;
    render_links(field, surface)
}

pub fn render_particles<R: Rng, S: Surface>(
    field: &ParticleField<R>,
    surface: &mut S,
) -> Result<(), String> {
    for p in field.particles() {
        surface.set_alpha(p.opacity);
        surface.fill_circle(p.pos, p.radius, &p.color.to_css())?;
    }
    Ok(())
}

pub fn render_links<R: Rng, S: Surface>(
    field: &ParticleField<R>,
    surface: &mut S,
) -> Result<(), String> {
    let config = field.config();
    let stroke = Color::from_u32(config.link_color).to_css();
    let particles = field.particles();

    surface.set_alpha(config.link_alpha);
    let result = field.links().into_iter().try_for_each(|(i, j)| {
        surface.stroke_line(particles[i].pos, particles[j].pos, &stroke, config.link_width)
    });
    // Restore even when a line failed, the next frame starts from full alpha
    surface.set_alpha(1.0);
    result
}
