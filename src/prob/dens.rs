use rand::Rng;
use rand_distr::{Distribution, StandardNormal, Open01};

pub(crate) fn ln_gamma(x : f64) -> f64 {
    special::Gamma::ln_gamma(x).0
}

fn beta_sanity_check(x : f64, a : f64, b : f64) -> bool {
    !x.is_nan() && a > 0.0 && b > 0.0
}

/// Log-density of the normal with the informed mean and standard deviation.
pub fn dnorm(x : f64, mu : f64, stddev : f64) -> f64 {
    dnorm_std((x - mu) / stddev, stddev.ln())
}

// Standardized form. The normalization is written through ln(stddev), so that callers
// that already carry the scale in log-space do not round-trip through exp().
pub(crate) fn dnorm_std(z : f64, ln_stddev : f64) -> f64 {
    -0.5 * (2.0*std::f64::consts::PI).ln() - ln_stddev - z.powf(2.0) / 2.0
}

/// Log-density of the gamma with the informed shape and rate (inverse scale).
pub fn dgamma(x : f64, shape : f64, rate : f64) -> f64 {
    if x.is_nan() || shape.is_nan() || rate.is_nan() || !(shape > 0.0) || !(rate > 0.0) {
        return f64::NAN;
    }
    if x < 0.0 || x.is_infinite() {
        return f64::NEG_INFINITY;
    }
    if x == 0.0 {
        return if shape < 1.0 {
            f64::INFINITY
        } else if shape > 1.0 {
            f64::NEG_INFINITY
        } else {
            rate.ln()
        };
    }
    shape*rate.ln() - ln_gamma(shape) + (shape - 1.0)*x.ln() - rate*x
}

/// Log-density of the beta distribution. The unit-interval boundaries are resolved
/// analytically so that degenerate sticks (a weight of exactly one) do not evaluate 0*ln(0).
pub fn dbeta(x : f64, a : f64, b : f64) -> f64 {
    if !beta_sanity_check(x, a, b) {
        return f64::NAN;
    }
    if x < 0.0 || x > 1.0 {
        return f64::NEG_INFINITY;
    }
    let ln_norm = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b);
    if x == 0.0 {
        if a < 1.0 {
            f64::INFINITY
        } else if a > 1.0 {
            f64::NEG_INFINITY
        } else {
            ln_norm
        }
    } else if x == 1.0 {
        if b < 1.0 {
            f64::INFINITY
        } else if b > 1.0 {
            f64::NEG_INFINITY
        } else {
            ln_norm
        }
    } else {
        ln_norm + (a - 1.0)*x.ln() + (b - 1.0)*(1.0 - x).ln()
    }
}

/// Log-density of a dirichlet at a probability vector informed by its logarithms.
pub fn ddirichlet_ln(ln_p : impl Iterator<Item=f64>, alpha : impl Iterator<Item=f64>) -> f64 {
    let mut alpha_sum = 0.0;
    let mut lp = 0.0;
    for (lnp, a) in ln_p.zip(alpha) {
        alpha_sum += a;
        lp += -ln_gamma(a);
        if a != 1.0 {
            lp += (a - 1.0)*lnp;
        }
    }
    lp + ln_gamma(alpha_sum)
}

/// Stable log(sum(exp(x))).
pub fn logsumexp(xs : &[f64]) -> f64 {
    let max = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max.is_infinite() {
        return max;
    }
    max + xs.iter().map(|x| (x - max).exp() ).sum::<f64>().ln()
}

pub(crate) fn std_normal<R : Rng>(rng : &mut R) -> f64 {
    rng.sample(StandardNormal)
}

/// Draws the logarithm of a Gamma(shape, 1) variate. For shape < 1 the draw is boosted
/// to shape + 1 and corrected by U^(1/shape), which keeps the result finite even when
/// the gamma variate itself would underflow to zero.
pub(crate) fn log_gamma_draw<R : Rng>(rng : &mut R, shape : f64) -> f64 {
    if shape >= 1.0 {
        gamma_draw(rng, shape).ln()
    } else {
        let u : f64 = rng.sample(Open01);
        gamma_draw(rng, shape + 1.0).ln() + u.ln() / shape
    }
}

fn gamma_draw<R : Rng>(rng : &mut R, shape : f64) -> f64 {
    match rand_distr::Gamma::new(shape, 1.0) {
        Ok(g) => g.sample(rng),
        Err(_) => f64::NAN
    }
}
