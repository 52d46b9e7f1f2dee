use std::iter::Sum;

use num_traits::Float;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::{GuessError, Result};

struct Sample<N: Float> {
    mean: N,
    len: N,
    var: N,
}

impl<N: Float + Sum> Sample<N> {
    /// Computes the mean and unbiased variance of a sample.
    ///
    /// Needs at least two observations.
    fn new<T: IntoIterator<Item = N> + Clone>(sample: T) -> Result<Self> {
        let (len, sum) = sample
            .clone()
            .into_iter()
            .fold((0_u32, N::zero()), |(count, sum), next| (count + 1, sum + next));

        if len < 2 {
            return Err(GuessError::Stats);
        }

        let len = N::from(len).ok_or(GuessError::Stats)?;
        let mean = sum / len;
        let var = sample.into_iter().map(|n| (n - mean).powi(2)).sum::<N>() / (len - N::one());

        Ok(Sample { mean, len, var })
    }
}

#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub(crate) struct WelchsT<N: Float> {
    /// The p-value of the test, which is the probability accepting the results
    /// of the test is an error because the null hypothesis is in fact true.
    pub(crate) p: N,

    /// The maximum allowed p-value.
    pub(crate) alpha: N,

}

impl<N: Float + Sum + Into<f64>> WelchsT<N> {
    /// Runs the two-tailed test on two samples.
    ///
    /// # Panics
    ///
    /// `alpha` must be in (0, 1).
    pub(crate) fn two_sample<T: IntoIterator<Item = N> + Clone, V: IntoIterator<Item = N> + Clone>(
        a: T,
        b: V,
        alpha: N,
    ) -> Result<Self> {
        assert!(alpha > N::zero() && alpha < N::one());

        let a = Sample::new(a)?;
        let b = Sample::new(b)?;

        // Uses equations from https://statisticaloddsandends.wordpress.com/2020/07/03/welchs-t-test-and-the-welch-satterthwaite-equation/.

        let a_se = a.var / a.len;
        let b_se = b.var / b.len;

        // Both samples are constant, so there is nothing to estimate.
        if a_se + b_se == N::zero() {
            let p = if a.mean == b.mean { N::one() } else { N::zero() };
            return Ok(Self { p, alpha });
        }

        // Calculate t-statistic.
        let t = (a.mean - b.mean).abs() / (a_se + b_se).sqrt();

        // Calculate degrees of freedom.
        let deg = (a_se + b_se).powi(2)
            / (a_se.powi(2) / (a.len - N::one()) + b_se.powi(2) / (b.len - N::one()));

        let dist = StudentsT::new(0.0, 1.0, deg.into()).map_err(|_| GuessError::Stats)?;

        let p = N::from(dist.cdf((-t).into())).ok_or(GuessError::Stats)? * (N::one() + N::one());

        Ok(Self {
            p: p.min(N::one()),
            alpha,
        })
    }

    pub(crate) fn is_significant(&self) -> bool {
        self.p < self.alpha
    }
}
