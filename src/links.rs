// Finds the pairs of particles close enough to be joined by a line.
//
// Particles are bucketed into a uniform grid whose cells are `max_distance`
// wide, so any qualifying pair sits in the same or an adjacent cell. Each
// pair is reported once, lower index first, which is the same set a plain
// `i < j` scan over every pair produces.

use crate::particle::Particle;
use std::collections::HashMap;

type Cell = (i64, i64);

// Half of the neighbourhood; the other half is covered when the
// neighbouring cell does its own scan
const FORWARD_NEIGHBOURS: [Cell; 4] = [(1, -1), (1, 0), (1, 1), (0, 1)];

pub fn find_links(particles: &[Particle], max_distance: f64) -> Vec<(usize, usize)> {
    let mut links = Vec::new();
    if !(max_distance > 0.0) || particles.len() < 2 {
        return links;
    }

    let mut grid: HashMap<Cell, Vec<usize>> = HashMap::new();
    for (i, p) in particles.iter().enumerate() {
        grid.entry(cell_of(p, max_distance)).or_default().push(i);
    }

    for (&(cx, cy), members) in &grid {
        for (k, &i) in members.iter().enumerate() {
            for &j in &members[k + 1..] {
                push_if_close(&mut links, particles, i, j, max_distance);
            }
        }
        for &(dx, dy) in FORWARD_NEIGHBOURS.iter() {
            // Far-out positions saturate their cell index; past the edge of
            // the index range there is no neighbour to visit
            let neighbour = match (cx.checked_add(dx), cy.checked_add(dy)) {
                (Some(nx), Some(ny)) => (nx, ny),
                _ => continue,
            };
            if let Some(others) = grid.get(&neighbour) {
                for &i in members {
                    for &j in others {
                        push_if_close(&mut links, particles, i, j, max_distance);
                    }
                }
            }
        }
    }

    links.sort_unstable();
    links
}

fn cell_of(p: &Particle, size: f64) -> Cell {
    ((p.pos[0] / size).floor() as i64, (p.pos[1] / size).floor() as i64)
}

fn push_if_close(
    links: &mut Vec<(usize, usize)>,
    particles: &[Particle],
    i: usize,
    j: usize,
    max_distance: f64,
) {
    // Unsquared: the square of an extreme threshold is not representable
    let d = vecmath::vec2_sub(particles[i].pos, particles[j].pos);
    if vecmath::vec2_len(d) < max_distance {
        links.push((i.min(j), i.max(j)));
    }
}
